//! Batch job execution with progress tracking
//!
//! A [`BatchJob`] is run once per item by a [`BatchRunner`], either one item
//! at a time or in concurrent chunks. Every state change is written to a
//! [`ProgressSink`](crate::core::progress::ProgressSink) under the job's
//! session token. [`BatchEngine`] starts runs in the background.

mod engine;
mod guard;
mod runner;
mod types;


pub use engine::BatchEngine;
pub use guard::{ClaimResult, DuplicateGuard};
pub use runner::BatchRunner;
pub use types::{BatchJob, ExecutionMode, ItemOutcome, JobSummary, OutcomeKind, WorkItem};
