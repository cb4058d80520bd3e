//! Configuration files end to end

use crate::assert_err;
use review_monitor::{Config, MonitorError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_full_config_file() {
    let file = write_config(
        r#"
server:
  host: "127.0.0.1"
  port: 9191
  cors_origins: ["https://ops.example.com"]
rate_limit:
  max_requests_per_window: 600
  window_secs: 60
  max_concurrency: 8
  max_retries: 5
  base_backoff_ms: 250
progress:
  retention_secs: 3600
batch:
  chunk_size: 4
  inter_chunk_delay_ms: 500
email:
  max_per_minute: 30
  test_email: "qa@example.com"
scheduler:
  enabled: false
"#,
    );

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.server().address(), "127.0.0.1:9191");
    assert_eq!(config.server().cors_origins, vec!["https://ops.example.com"]);
    assert_eq!(config.rate_limit().max_retries, 5);
    assert_eq!(config.rate_limit().base_backoff().as_millis(), 250);
    assert_eq!(config.progress().retention().as_secs(), 3600);
    assert_eq!(config.batch().chunk_size, 4);
    assert_eq!(config.batch().inter_chunk_delay().as_millis(), 500);
    assert_eq!(config.email().test_email.as_deref(), Some("qa@example.com"));
    assert!(!config.scheduler().enabled);

    // round trip through YAML keeps every value
    let yaml = config.to_yaml().unwrap();
    let again = Config::from_file(write_config(&yaml).path()).await.unwrap();
    assert_eq!(again.app, config.app);
}

#[tokio::test]
async fn test_invalid_sections_are_named() {
    let file = write_config("rate_limit:\n  max_concurrency: 0\n");
    let error = assert_err!(Config::from_file(file.path()).await);
    match error {
        MonitorError::Config(message) => assert!(message.contains("Rate limit")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_yaml_is_a_config_error() {
    let file = write_config("server: [not, a, map");
    let error = assert_err!(Config::from_file(file.path()).await);
    assert!(matches!(error, MonitorError::Config(_)));
}
