//! Domain records the batch jobs work on

pub mod company;
pub mod monitor;
pub mod outreach;
pub mod report;
pub mod review;


pub use company::{Company, ImportRow};
pub use monitor::{ExecutionStatus, MonitorExecution, ScheduleType, ScheduledMonitor};
pub use outreach::{CustomerEmail, OutreachResult};
pub use report::{CompanyReviewReport, ReportPeriod, ReviewMonitorReport};
pub use review::{CompanyReviewData, Review, ReviewFilter, average_rating};
