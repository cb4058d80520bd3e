//! Configuration data models
//!
//! This module defines all configuration structures used throughout the service.

pub mod app;
pub mod batch;
pub mod email;
pub mod places;
pub mod progress;
pub mod rate_limit;
pub mod scheduler;
pub mod server;

// Re-export all configuration types
pub use app::*;
pub use batch::*;
pub use email::*;
pub use places::*;
pub use progress::*;
pub use rate_limit::*;
pub use scheduler::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

/// Requests admitted per sliding window by the Places quota
pub fn default_max_requests_per_window() -> u32 {
    5000
}

pub fn default_window_secs() -> u64 {
    60
}

pub fn default_max_concurrency() -> usize {
    50
}

pub fn default_base_backoff_ms() -> u64 {
    1000
}

pub fn default_retention_secs() -> u64 {
    2 * 60 * 60
}

pub fn default_active_retention_secs() -> u64 {
    24 * 60 * 60
}

pub fn default_cleanup_interval_secs() -> u64 {
    15 * 60
}

pub fn default_chunk_size() -> usize {
    10
}

pub fn default_inter_chunk_delay_ms() -> u64 {
    3000
}

pub fn default_recent_results_limit() -> usize {
    10
}

pub fn default_places_base_url() -> String {
    "https://places.googleapis.com".to_string()
}

pub fn default_request_timeout_secs() -> u64 {
    30
}

pub fn default_emails_per_minute() -> u32 {
    60
}

pub fn default_check_interval_secs() -> u64 {
    5 * 60
}

pub fn default_true() -> bool {
    true
}
