//! Logging setup
//!
//! Initialises the global `tracing` subscriber and provides small helpers for
//! keeping secrets out of log lines.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Output format of the log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive`. Calling this twice is
/// harmless; the second call leaves the first subscriber in place.
pub fn init_tracing(format: LogFormat, default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }
}

/// Replace every occurrence of `secret` in `input`, keeping the first two characters
pub fn redact(input: &str, secret: &str) -> String {
    if secret.is_empty() {
        return input.to_string();
    }
    let masked = if secret.chars().count() > 8 {
        format!("{}***", secret.chars().take(2).collect::<String>())
    } else {
        "***".to_string()
    };
    input.replace(secret, &masked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_long_secret() {
        let url = "https://places.googleapis.com/v1/places/abc?key=AIzaSyExample123";
        let redacted = redact(url, "AIzaSyExample123");
        assert!(!redacted.contains("AIzaSyExample123"));
        assert!(redacted.ends_with("key=AI***"));
    }

    #[test]
    fn test_redact_short_and_empty_secret() {
        assert_eq!(redact("key=abc", "abc"), "key=***");
        assert_eq!(redact("key=abc", ""), "key=abc");
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(LogFormat::Pretty, "info");
        init_tracing(LogFormat::Json, "debug");
    }
}
