//! Review scraping

use crate::core::batch::{BatchJob, ItemOutcome};
use crate::core::models::Company;
use crate::services::scraper::{ReviewScraper, ScrapingOptions};
use crate::storage::RecordStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Scrapes and stores reviews, one scraper session per company
pub struct ScrapeReviewsJob {
    store: Arc<dyn RecordStore>,
    scraper: Arc<dyn ReviewScraper>,
    options: ScrapingOptions,
}

impl ScrapeReviewsJob {
    pub fn new(
        store: Arc<dyn RecordStore>,
        scraper: Arc<dyn ReviewScraper>,
        options: ScrapingOptions,
    ) -> Self {
        Self {
            store,
            scraper,
            options,
        }
    }
}

#[async_trait]
impl BatchJob for ScrapeReviewsJob {
    type Item = Company;
    type Output = ();

    fn name(&self) -> &'static str {
        "scrape_reviews"
    }

    async fn process(&self, company: Company) -> Result<ItemOutcome<()>> {
        let mut session = self.scraper.open_session().await?;
        let scraped = session.scrape(&company, &self.options).await;
        if let Err(e) = session.close().await {
            warn!(company = %company.name, error = %e, "Scraper session did not close cleanly");
        }

        let stored = self.store.replace_reviews(&company.id, scraped?).await?;
        Ok(ItemOutcome::succeeded(format!(
            "✓ {}: {} reviews scraped",
            company.name, stored
        )))
    }
}
