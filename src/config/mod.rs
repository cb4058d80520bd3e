//! Configuration management
//!
//! This module handles loading, validation, and access to the service configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MonitorError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the service
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Service configuration
    pub app: AppConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MonitorError::Config(format!("Failed to read config file: {}", e)))?;

        let app: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { app };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            app: AppConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load the file when it exists, then overlay the environment
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await?
        } else {
            info!("Config file {:?} not found, using defaults", path);
            Self::default()
        };

        config.app.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn server(&self) -> &ServerConfig {
        &self.app.server
    }

    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.app.rate_limit
    }

    pub fn progress(&self) -> &ProgressConfig {
        &self.app.progress
    }

    pub fn batch(&self) -> &BatchConfig {
        &self.app.batch
    }

    pub fn places(&self) -> &PlacesConfig {
        &self.app.places
    }

    pub fn email(&self) -> &EmailConfig {
        &self.app.email
    }

    pub fn scheduler(&self) -> &SchedulerConfig {
        &self.app.scheduler
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(&self.app).map_err(MonitorError::Config)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.app)
            .map_err(|e| MonitorError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_from_file() {
        let config_content = r#"
server:
  host: "127.0.0.1"
  port: 9090

rate_limit:
  max_requests_per_window: 100
  max_concurrency: 4

batch:
  chunk_size: 5
  inter_chunk_delay_ms: 0

places:
  api_key: "test-key"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = Config::from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.server().address(), "127.0.0.1:9090");
        assert_eq!(config.rate_limit().max_requests_per_window, 100);
        assert_eq!(config.rate_limit().max_concurrency, 4);
        assert_eq!(config.rate_limit().max_retries, 3);
        assert_eq!(config.batch().chunk_size, 5);
        assert_eq!(config.places().api_key.as_deref(), Some("test-key"));
        assert_eq!(config.progress().retention_secs, 7200);
    }

    #[tokio::test]
    async fn test_invalid_config_file_is_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"batch:\n  chunk_size: 0\n")
            .unwrap();

        let result = Config::from_file(temp_file.path()).await;
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(config.batch().chunk_size, 10);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip_keeps_sections() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("rate_limit"));
        assert!(yaml.contains("max_requests_per_window: 5000"));
    }
}
