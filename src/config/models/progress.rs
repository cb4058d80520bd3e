//! Progress store retention configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressConfig {
    /// How long finished snapshots and reports stay readable after their last write
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
    /// Retention for snapshots of runs that have not finished yet
    #[serde(default = "default_active_retention_secs")]
    pub active_retention_secs: u64,
    /// Period of the background eviction sweep
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            active_retention_secs: default_active_retention_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl ProgressConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn active_retention(&self) -> Duration {
        Duration::from_secs(self.active_retention_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.retention_secs == 0 {
            return Err("retention_secs must be greater than 0".to_string());
        }
        if self.active_retention_secs < self.retention_secs {
            return Err("active_retention_secs cannot be shorter than retention_secs".to_string());
        }
        if self.cleanup_interval_secs == 0 {
            return Err("cleanup_interval_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
