//! Batch jobs run by the engine
//!
//! Each job is one per-item operation plugged into the generic
//! [`BatchRunner`](crate::core::batch::BatchRunner).

mod import;
mod outreach;
mod refresh;
mod report;
mod scrape;


pub use import::ImportCompaniesJob;
pub use outreach::{Delivered, OutreachEmailJob};
pub use refresh::RefreshReviewsJob;
pub use report::ReviewReportJob;
pub use scrape::ScrapeReviewsJob;

use crate::core::batch::WorkItem;
use crate::core::models::{Company, CustomerEmail, ImportRow};

impl WorkItem for Company {
    fn label(&self) -> String {
        self.name.clone()
    }
}

impl WorkItem for ImportRow {
    fn label(&self) -> String {
        self.name.trim().to_string()
    }
}

impl WorkItem for CustomerEmail {
    fn label(&self) -> String {
        format!("{} <{}>", self.company_name, self.email)
    }
}
