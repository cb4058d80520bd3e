//! Remote call rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Limits applied to every outbound call to the Places API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitConfig {
    /// Requests admitted in any trailing window
    #[serde(default = "default_max_requests_per_window")]
    pub max_requests_per_window: u32,
    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Concurrent in-flight calls across all jobs
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Retries after a "too many requests" answer or a transient error
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff unit; retry `k` waits `base * 2^k`
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: default_max_requests_per_window(),
            window_secs: default_window_secs(),
            max_concurrency: default_max_concurrency(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_requests_per_window == 0 {
            return Err("max_requests_per_window must be greater than 0".to_string());
        }
        if self.window_secs == 0 {
            return Err("window_secs must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.max_retries > 10 {
            return Err("max_retries cannot exceed 10".to_string());
        }
        Ok(())
    }
}
