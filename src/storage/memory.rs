//! In-process record store

use super::RecordStore;
use crate::core::models::{Company, MonitorExecution, Review, ScheduledMonitor};
use crate::utils::error::{MonitorError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

#[derive(Default)]
struct Records {
    companies: HashMap<String, Company>,
    reviews: HashMap<String, Vec<Review>>,
    monitors: HashMap<String, ScheduledMonitor>,
    executions: Vec<MonitorExecution>,
}

/// [`RecordStore`] backed by hash maps; contents are lost on restart
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `companies`; place id conflicts are skipped
    pub fn with_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        let store = Self::new();
        {
            let mut records = store.records.write();
            for company in companies {
                if place_id_taken(&records, &company) {
                    continue;
                }
                records.companies.insert(company.id.clone(), company);
            }
        }
        store
    }
}

fn place_id_taken(records: &Records, company: &Company) -> bool {
    company.place_id().is_some_and(|place_id| {
        records
            .companies
            .values()
            .any(|other| other.id != company.id && other.place_id() == Some(place_id))
    })
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn list_companies(&self) -> Result<Vec<Company>> {
        let mut companies: Vec<Company> = self.records.read().companies.values().cloned().collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn get_company(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.records.read().companies.get(id).cloned())
    }

    async fn insert_company(&self, company: Company) -> Result<Company> {
        let mut records = self.records.write();
        if records.companies.contains_key(&company.id) {
            return Err(MonitorError::conflict(format!(
                "company {} already exists",
                company.id
            )));
        }
        if place_id_taken(&records, &company) {
            return Err(MonitorError::conflict(format!(
                "a company with place id {} already exists",
                company.place_id().unwrap_or_default()
            )));
        }

        debug!(company = %company.name, id = %company.id, "Company stored");
        records
            .companies
            .insert(company.id.clone(), company.clone());
        Ok(company)
    }

    async fn update_company(&self, company: Company) -> Result<()> {
        let mut records = self.records.write();
        if !records.companies.contains_key(&company.id) {
            return Err(MonitorError::not_found(format!(
                "company {} not found",
                company.id
            )));
        }
        if place_id_taken(&records, &company) {
            return Err(MonitorError::conflict(format!(
                "a company with place id {} already exists",
                company.place_id().unwrap_or_default()
            )));
        }
        records.companies.insert(company.id.clone(), company);
        Ok(())
    }

    async fn place_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .records
            .read()
            .companies
            .values()
            .filter_map(|c| c.place_id().map(str::to_string))
            .collect())
    }

    async fn replace_reviews(&self, company_id: &str, mut reviews: Vec<Review>) -> Result<usize> {
        reviews.sort_by(|a, b| b.time.cmp(&a.time));
        let count = reviews.len();
        self.records
            .write()
            .reviews
            .insert(company_id.to_string(), reviews);
        Ok(count)
    }

    async fn reviews_for(&self, company_id: &str) -> Result<Vec<Review>> {
        Ok(self
            .records
            .read()
            .reviews
            .get(company_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_monitors(&self) -> Result<Vec<ScheduledMonitor>> {
        let mut monitors: Vec<ScheduledMonitor> =
            self.records.read().monitors.values().cloned().collect();
        monitors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(monitors)
    }

    async fn get_monitor(&self, id: &str) -> Result<Option<ScheduledMonitor>> {
        Ok(self.records.read().monitors.get(id).cloned())
    }

    async fn save_monitor(&self, monitor: ScheduledMonitor) -> Result<()> {
        self.records
            .write()
            .monitors
            .insert(monitor.id.clone(), monitor);
        Ok(())
    }

    async fn delete_monitor(&self, id: &str) -> Result<bool> {
        Ok(self.records.write().monitors.remove(id).is_some())
    }

    async fn due_monitors(&self, now: DateTime<Utc>) -> Result<Vec<ScheduledMonitor>> {
        let mut due: Vec<ScheduledMonitor> = self
            .records
            .read()
            .monitors
            .values()
            .filter(|m| m.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|m| m.next_run_at);
        Ok(due)
    }

    async fn record_execution(&self, execution: MonitorExecution) -> Result<()> {
        self.records.write().executions.push(execution);
        Ok(())
    }

    async fn executions(&self, monitor_id: &str, limit: usize) -> Result<Vec<MonitorExecution>> {
        let mut history: Vec<MonitorExecution> = self
            .records
            .read()
            .executions
            .iter()
            .filter(|e| e.monitor_id == monitor_id)
            .cloned()
            .collect();
        history.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        history.truncate(limit);
        Ok(history)
    }
}
