//! Error mapping seen by HTTP clients

use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use review_monitor::MonitorError;
use serde_json::Value;

async fn body_of(error: &MonitorError) -> Value {
    let response = error.error_response();
    let bytes = to_bytes(response.into_body()).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[actix_web::test]
async fn test_client_errors_carry_their_message() {
    let error = MonitorError::validation("maxRating must be between 1 and 5");
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

    let body = body_of(&error).await;
    assert_eq!(body["success"], Value::Bool(false));
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("maxRating")
    );
}

#[actix_web::test]
async fn test_internal_details_stay_hidden() {
    let error = MonitorError::storage("connection string postgres://secret@db");
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_of(&error).await;
    assert_eq!(body["error"]["code"], "STORAGE_ERROR");
    assert_eq!(body["error"]["message"], "Internal error");
}

#[actix_web::test]
async fn test_throttling_maps_to_too_many_requests() {
    let error = MonitorError::rate_limit("Places API is still throttling after all retries");
    assert_eq!(error.status_code(), StatusCode::TOO_MANY_REQUESTS);
    assert!(error.is_transient());

    let body = body_of(&error).await;
    assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
}

#[test]
fn test_only_remote_failures_are_transient() {
    assert!(MonitorError::external("502").is_transient());
    assert!(!MonitorError::not_found("place").is_transient());
    assert!(!MonitorError::conflict("place id").is_transient());
    assert!(!MonitorError::config("missing key").is_transient());
}
