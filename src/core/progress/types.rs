//! Progress types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Result payload attached to a session, shared by reference on reads
pub type JobReport = Arc<serde_json::Value>;

/// Opaque identifier correlating a submitted job with its progress
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a fresh token from a random 128-bit value
    pub fn issue() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Lifecycle state of a batch job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Initializing,
    Starting,
    Processing,
    Sending,
    Complete,
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

/// Observable state of one job at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub total_items: usize,
    pub processed_items: usize,
    pub successful_items: usize,
    /// Includes the duplicates counted in `duplicate_items`
    pub failed_items: usize,
    /// Items skipped on purpose because their unique key was already taken
    pub duplicate_items: usize,
    pub current_item: String,
    pub status: JobStatus,
    pub estimated_remaining_seconds: u64,
    pub is_complete: bool,
    pub start_time: DateTime<Utc>,
    /// Items processed per minute so far
    pub requests_per_minute: f64,
    /// Most recent last
    pub recent_results: Vec<String>,
    pub rate_limit_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

impl ProgressSnapshot {
    /// Snapshot written when a job is submitted
    pub fn initializing(total_items: usize) -> Self {
        Self {
            total_items,
            processed_items: 0,
            successful_items: 0,
            failed_items: 0,
            duplicate_items: 0,
            current_item: "Initializing...".to_string(),
            status: JobStatus::Initializing,
            estimated_remaining_seconds: 0,
            is_complete: false,
            start_time: Utc::now(),
            requests_per_minute: 0.0,
            recent_results: Vec::new(),
            rate_limit_info: String::new(),
            redirect_url: None,
        }
    }

    pub fn remaining_items(&self) -> usize {
        self.total_items.saturating_sub(self.processed_items)
    }

    /// Append a result label, keeping only the newest `limit`
    pub fn push_recent(&mut self, label: String, limit: usize) {
        self.recent_results.push(label);
        if self.recent_results.len() > limit {
            let excess = self.recent_results.len() - limit;
            self.recent_results.drain(..excess);
        }
    }

    /// Mark terminal with an error description
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = JobStatus::Error;
        self.is_complete = true;
        self.current_item = message.into();
        self.estimated_remaining_seconds = 0;
    }
}
