//! Core functionality of the monitor
//!
//! The batch engine, its progress store and the rate-limited caller shared by
//! every job, plus the domain records the jobs work on.

pub mod batch;
pub mod models;
pub mod progress;
pub mod rate_limiter;

pub use batch::{BatchEngine, BatchJob, BatchRunner, ExecutionMode, ItemOutcome, WorkItem};
pub use progress::{JobStatus, ProgressSnapshot, ProgressStore, SessionToken};
pub use rate_limiter::RemoteCaller;
