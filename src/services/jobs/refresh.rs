//! Review refresh

use crate::core::batch::{BatchJob, ItemOutcome};
use crate::core::models::Company;
use crate::services::places::PlacesClient;
use crate::storage::RecordStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Fetches current reviews per company and stores them with the new rating
pub struct RefreshReviewsJob {
    store: Arc<dyn RecordStore>,
    places: PlacesClient,
}

impl RefreshReviewsJob {
    pub fn new(store: Arc<dyn RecordStore>, places: PlacesClient) -> Self {
        Self { store, places }
    }
}

#[async_trait]
impl BatchJob for RefreshReviewsJob {
    type Item = Company;
    type Output = ();

    fn name(&self) -> &'static str {
        "refresh_reviews"
    }

    async fn process(&self, mut company: Company) -> Result<ItemOutcome<()>> {
        let data = self.places.get_reviews(&company).await?;
        let stored = self.store.replace_reviews(&company.id, data.reviews).await?;

        company.overall_rating = Some(data.average_rating);
        company.last_updated = Utc::now();
        let label = format!(
            "✓ {}: {} reviews, rating {:.1}",
            company.name, stored, data.average_rating
        );
        self.store.update_company(company).await?;

        Ok(ItemOutcome::succeeded(label))
    }

    fn context(&self) -> String {
        self.places.caller().describe()
    }
}
