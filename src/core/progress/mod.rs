//! Job progress tracking
//!
//! Session tokens, progress snapshots and the expiring in-memory store that
//! pollers read while a batch job runs.

mod store;
mod types;


pub use store::{ProgressSink, ProgressStore};
pub use types::{JobReport, JobStatus, ProgressSnapshot, SessionToken};
