//! Top-level service configuration

use super::*;
use crate::utils::error::{MonitorError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// All configuration sections of the service
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Overlay the values set in the environment on top of `self`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(host) = env_var("REVIEW_MONITOR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("REVIEW_MONITOR_PORT")? {
            self.server.port = port;
        }
        if let Some(key) = env_var("GOOGLE_PLACES_API_KEY") {
            self.places.api_key = Some(key);
        }
        if let Some(url) = env_var("GOOGLE_PLACES_BASE_URL") {
            self.places.base_url = url;
        }
        if let Some(limit) = env_parse("PLACES_MAX_REQUESTS_PER_MINUTE")? {
            self.rate_limit.max_requests_per_window = limit;
        }
        if let Some(concurrency) = env_parse("PLACES_MAX_CONCURRENCY")? {
            self.rate_limit.max_concurrency = concurrency;
        }
        if let Some(address) = env_var("OUTREACH_TEST_EMAIL") {
            self.email.test_email = Some(address);
        }
        if let Some(enabled) = env_parse("SCHEDULER_ENABLED")? {
            self.scheduler.enabled = enabled;
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| {
                MonitorError::Config(format!("Invalid value for {}: {} ({})", name, raw, e))
            })
        })
        .transpose()
}
