//! Batch job types

use crate::config::BatchConfig;
use crate::core::progress::{JobReport, JobStatus, SessionToken};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Anything a batch job iterates over
pub trait WorkItem: Send + 'static {
    /// Human readable name shown as the current item while polling
    fn label(&self) -> String;
}

/// How one item ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Succeeded,
    Failed,
    /// Skipped on purpose: its unique key was already taken
    Duplicate,
}

/// Outcome of processing one item
#[derive(Debug)]
pub struct ItemOutcome<O> {
    pub kind: OutcomeKind,
    /// Short text for the recent results list
    pub label: String,
    /// Data handed to [`BatchJob::finish`]
    pub output: Option<O>,
}

impl<O> ItemOutcome<O> {
    pub fn succeeded(label: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Succeeded,
            label: label.into(),
            output: None,
        }
    }

    pub fn with_output(label: impl Into<String>, output: O) -> Self {
        Self {
            kind: OutcomeKind::Succeeded,
            label: label.into(),
            output: Some(output),
        }
    }

    pub fn failed(label: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Failed,
            label: label.into(),
            output: None,
        }
    }

    /// Failed item that still hands data to [`BatchJob::finish`]
    pub fn failed_with(label: impl Into<String>, output: O) -> Self {
        Self {
            kind: OutcomeKind::Failed,
            label: label.into(),
            output: Some(output),
        }
    }

    pub fn duplicate(label: impl Into<String>) -> Self {
        Self {
            kind: OutcomeKind::Duplicate,
            label: label.into(),
            output: None,
        }
    }
}

/// Progress granularity and concurrency of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One item at a time, progress before every item
    Sequential,
    /// Items of a chunk run concurrently, progress after every chunk
    Chunked {
        chunk_size: usize,
        inter_chunk_delay: Duration,
    },
}

impl ExecutionMode {
    pub fn chunked(config: &BatchConfig) -> Self {
        ExecutionMode::Chunked {
            chunk_size: config.chunk_size,
            inter_chunk_delay: config.inter_chunk_delay(),
        }
    }
}

/// Totals of a finished run
#[derive(Debug, Clone)]
pub struct JobSummary {
    pub total: usize,
    pub processed: usize,
    pub succeeded: usize,
    /// Includes duplicates
    pub failed: usize,
    pub duplicates: usize,
    pub elapsed: Duration,
    pub status: JobStatus,
    /// Diagnostic of a job-level failure
    pub error: Option<String>,
    pub report: Option<JobReport>,
}

/// A unit of work run once per item by the [`BatchRunner`](super::BatchRunner)
#[async_trait]
pub trait BatchJob: Send + Sync + 'static {
    type Item: WorkItem;
    type Output: Send + 'static;

    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Job-level setup run before the first item; an error ends the run
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }

    /// Process one item. An `Err` counts as a failed item and the run goes on.
    async fn process(&self, item: Self::Item) -> Result<ItemOutcome<Self::Output>>;

    /// Turn the collected outputs into the result payload; an error ends the run
    async fn finish(
        &self,
        _outputs: Vec<Self::Output>,
        _summary: &JobSummary,
    ) -> Result<Option<serde_json::Value>> {
        Ok(None)
    }

    /// Free text shown as `rate_limit_info`, refreshed on every progress write
    fn context(&self) -> String {
        String::new()
    }

    /// Status shown while items are being worked on
    fn active_status(&self) -> JobStatus {
        JobStatus::Processing
    }

    /// Where the poller should go once the run is complete
    fn redirect_url(&self, _token: &SessionToken) -> Option<String> {
        None
    }
}
