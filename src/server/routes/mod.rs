//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod batch;
pub mod companies;
pub mod health;
pub mod monitors;
pub mod progress;

use actix_web::HttpResponse;

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    /// Convert the API response to an HTTP 200 response
    ///
    /// Failures never pass through here; they are rendered by
    /// `MonitorError`'s `ResponseError` impl as `{success: false, error}`.
    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

/// Answer to every job submission
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub session_id: String,
    pub total_items: usize,
}
