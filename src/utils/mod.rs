//! Utility modules for the review monitor
//!
//! - **error**: error type, `Result` alias and HTTP error mapping
//! - **logging**: tracing subscriber setup and log redaction

pub mod error;
pub mod logging;
