//! Error handling for the review monitor
//!
//! This module defines the error type shared by the batch engine, the
//! collaborators and the HTTP layer.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Result type alias for the review monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the review monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors, stripped of the request URL
    #[error("HTTP client error: {0}")]
    HttpClient(reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Downstream API answered "too many requests" after all retries
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness conflicts raised by the record store
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Network errors
    #[error("Network error: {0}")]
    Network(String),

    /// External service errors (non-success answers from the Places API)
    #[error("External service error: {0}")]
    External(String),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Email delivery errors
    #[error("Email error: {0}")]
    Email(String),

    /// Scraper errors
    #[error("Scraper error: {0}")]
    Scraper(String),

    /// Job-level errors (setup or teardown of a batch run)
    #[error("Job error: {0}")]
    Job(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for MonitorError {
    fn from(e: reqwest::Error) -> Self {
        // keep request URLs out of messages shown to pollers
        MonitorError::HttpClient(e.without_url())
    }
}

impl MonitorError {
    /// Whether the remote caller may retry an operation that failed with this error
    pub fn is_transient(&self) -> bool {
        match self {
            MonitorError::HttpClient(e) => {
                e.is_timeout() || e.is_connect() || e.is_request() || e.is_body()
            }
            MonitorError::Network(_)
            | MonitorError::Timeout(_)
            | MonitorError::External(_)
            | MonitorError::RateLimit(_) => true,
            _ => false,
        }
    }

    /// Machine readable status and code for the HTTP layer
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            MonitorError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            MonitorError::HttpClient(_) => (StatusCode::BAD_GATEWAY, "HTTP_CLIENT_ERROR"),
            MonitorError::Serialization(_) => (StatusCode::BAD_REQUEST, "SERIALIZATION_ERROR"),
            MonitorError::Yaml(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            MonitorError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
            MonitorError::RateLimit(_) => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
            MonitorError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            MonitorError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            MonitorError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            MonitorError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            MonitorError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            MonitorError::Network(_) => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
            MonitorError::External(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR"),
            MonitorError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            MonitorError::Email(_) => (StatusCode::BAD_GATEWAY, "EMAIL_ERROR"),
            MonitorError::Scraper(_) => (StatusCode::BAD_GATEWAY, "SCRAPER_ERROR"),
            MonitorError::Job(_) => (StatusCode::INTERNAL_SERVER_ERROR, "JOB_ERROR"),
            MonitorError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl ResponseError for MonitorError {
    fn status_code(&self) -> StatusCode {
        self.status_and_code().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code) = self.status_and_code();

        // Internal details stay in the logs
        let message = match self {
            MonitorError::Storage(_) | MonitorError::Io(_) | MonitorError::Internal(_) => {
                tracing::error!(error = %self, "Request failed with internal error");
                "Internal error".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(status_code).json(serde_json::json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message,
            }
        }))
    }
}
