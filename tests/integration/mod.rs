//! Integration tests for review-monitor
//!
//! These tests drive the public API across module boundaries: jobs through
//! the engine against a mock Places API, the scheduler end to end, config
//! files and the HTTP error mapping.

pub mod config_tests;
pub mod error_handling_tests;
pub mod review_pipeline_tests;
pub mod scheduler_tests;
