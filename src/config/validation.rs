//! Configuration validation
//!
//! Every section validates itself; [`Validate`] ties them together so a bad
//! value is reported with the section it came from.

use super::models::*;
use tracing::debug;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| format!("Server config error: {}", e))?;
        self.rate_limit
            .validate()
            .map_err(|e| format!("Rate limit config error: {}", e))?;
        self.progress
            .validate()
            .map_err(|e| format!("Progress config error: {}", e))?;
        self.batch
            .validate()
            .map_err(|e| format!("Batch config error: {}", e))?;
        self.places
            .validate()
            .map_err(|e| format!("Places config error: {}", e))?;
        self.email
            .validate()
            .map_err(|e| format!("Email config error: {}", e))?;
        self.scheduler
            .validate()
            .map_err(|e| format!("Scheduler config error: {}", e))?;

        debug!("Configuration validation completed");
        Ok(())
    }
}
