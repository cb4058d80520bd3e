//! Batch execution defaults

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Items run concurrently per chunk in chunked mode
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Cooldown between two chunks
    #[serde(default = "default_inter_chunk_delay_ms")]
    pub inter_chunk_delay_ms: u64,
    /// Labels kept in `recent_results`
    #[serde(default = "default_recent_results_limit")]
    pub recent_results_limit: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            inter_chunk_delay_ms: default_inter_chunk_delay_ms(),
            recent_results_limit: default_recent_results_limit(),
        }
    }
}

impl BatchConfig {
    pub fn inter_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.inter_chunk_delay_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        if self.recent_results_limit == 0 {
            return Err("recent_results_limit must be greater than 0".to_string());
        }
        Ok(())
    }
}
