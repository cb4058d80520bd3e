//! Storage layer for the monitor
//!
//! Companies, their reviews, scheduled monitors and monitor history live
//! behind [`RecordStore`]. [`MemoryStore`] keeps them in process.

mod memory;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;

use crate::core::models::{Company, MonitorExecution, Review, ScheduledMonitor};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};

/// Persistent records the batch jobs read and write
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// All companies ordered by name
    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn get_company(&self, id: &str) -> Result<Option<Company>>;

    /// Insert a new company; a second company with the same place id is a `Conflict`
    async fn insert_company(&self, company: Company) -> Result<Company>;

    /// Overwrite an existing company; unknown ids are `NotFound`
    async fn update_company(&self, company: Company) -> Result<()>;

    /// Place ids of every stored company
    async fn place_ids(&self) -> Result<Vec<String>>;

    /// Companies with the given ids, unknown ids skipped
    async fn companies_by_ids(&self, ids: &[String]) -> Result<Vec<Company>> {
        let mut companies = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(company) = self.get_company(id).await? {
                companies.push(company);
            }
        }
        Ok(companies)
    }

    /// Swap the stored reviews of a company; returns how many are stored now
    async fn replace_reviews(&self, company_id: &str, reviews: Vec<Review>) -> Result<usize>;

    /// Stored reviews of a company, newest first
    async fn reviews_for(&self, company_id: &str) -> Result<Vec<Review>>;

    async fn list_monitors(&self) -> Result<Vec<ScheduledMonitor>>;

    async fn get_monitor(&self, id: &str) -> Result<Option<ScheduledMonitor>>;

    /// Insert or overwrite
    async fn save_monitor(&self, monitor: ScheduledMonitor) -> Result<()>;

    async fn delete_monitor(&self, id: &str) -> Result<bool>;

    /// Active monitors whose next run is at or before `now`
    async fn due_monitors(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledMonitor>>;

    async fn record_execution(&self, execution: MonitorExecution) -> Result<()>;

    /// Newest first, at most `limit`
    async fn executions(&self, monitor_id: &str, limit: usize) -> Result<Vec<MonitorExecution>>;
}
