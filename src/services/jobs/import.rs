//! Company import

use crate::core::batch::{BatchJob, ClaimResult, DuplicateGuard, ItemOutcome, JobSummary};
use crate::core::models::{Company, ImportRow};
use crate::services::places::{PlacesClient, extract_place_id};
use crate::storage::RecordStore;
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Resolves each row to a Google place and stores it as a new company.
///
/// The place comes from the row's id, else from its Google Maps link, else
/// from a text search on name and location.
///
/// Rows whose place is already stored, or appeared earlier in the same
/// import, are counted as duplicates.
pub struct ImportCompaniesJob {
    store: Arc<dyn RecordStore>,
    places: PlacesClient,
    guard: OnceCell<DuplicateGuard>,
}

impl ImportCompaniesJob {
    pub fn new(store: Arc<dyn RecordStore>, places: PlacesClient) -> Self {
        Self {
            store,
            places,
            guard: OnceCell::new(),
        }
    }

    fn guard(&self) -> Result<&DuplicateGuard> {
        self.guard
            .get()
            .ok_or_else(|| MonitorError::internal("import processed before it was prepared"))
    }
}

#[async_trait]
impl BatchJob for ImportCompaniesJob {
    type Item = ImportRow;
    type Output = Company;

    fn name(&self) -> &'static str {
        "import_companies"
    }

    async fn prepare(&self) -> Result<()> {
        let existing = self.store.place_ids().await?;
        debug!(existing = existing.len(), "Loaded existing place ids");
        self.guard
            .set(DuplicateGuard::new(existing))
            .map_err(|_| MonitorError::job("import job was already run"))
    }

    async fn process(&self, mut row: ImportRow) -> Result<ItemOutcome<Company>> {
        let name = row.name.trim().to_string();
        if name.is_empty() {
            return Err(MonitorError::validation("row has no company name"));
        }

        let given = row
            .place_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .or_else(|| row.google_maps_url.as_deref().and_then(extract_place_id));
        let place_id = match given {
            Some(place_id) => place_id,
            None => match self.places.search_place(&name, row.location.as_deref()).await? {
                Some(hit) => {
                    if row.google_maps_url.is_none() {
                        row.google_maps_url = hit.google_maps_url;
                    }
                    if row.address.is_none() {
                        row.address = hit.formatted_address;
                    }
                    hit.place_id
                }
                None => return Ok(ItemOutcome::failed(format!("✗ {}: no matching place", name))),
            },
        };

        if self.guard()?.claim(&place_id) == ClaimResult::Duplicate {
            return Ok(ItemOutcome::duplicate(format!("⚠ {}: already imported", name)));
        }

        match self.store.insert_company(row.into_company(place_id)).await {
            Ok(company) => Ok(ItemOutcome::with_output(format!("✓ {}", company.name), company)),
            Err(MonitorError::Conflict(_)) => {
                Ok(ItemOutcome::duplicate(format!("⚠ {}: already imported", name)))
            }
            Err(e) => Err(e),
        }
    }

    async fn finish(
        &self,
        outputs: Vec<Company>,
        summary: &JobSummary,
    ) -> Result<Option<serde_json::Value>> {
        Ok(Some(json!({
            "imported": outputs.len(),
            "duplicates": summary.duplicates,
            "failed": summary.failed - summary.duplicates,
            "companies": outputs,
        })))
    }

    fn context(&self) -> String {
        self.places.caller().describe()
    }
}
