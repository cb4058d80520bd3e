//! Error handling utilities

pub mod error;
mod helpers;


pub use error::{MonitorError, Result};
