//! Mock Places API

use review_monitor::config::{PlacesConfig, RateLimitConfig};
use review_monitor::core::rate_limiter::RemoteCaller;
use review_monitor::services::PlacesClient;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "integration-key";

/// A wiremock server answering like the Places API
pub struct MockPlaces {
    pub server: MockServer,
}

impl MockPlaces {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Rate limits tight enough to finish quickly in tests
    pub fn rate_limits() -> RateLimitConfig {
        RateLimitConfig {
            max_concurrency: 4,
            max_retries: 2,
            base_backoff_ms: 1,
            ..RateLimitConfig::default()
        }
    }

    pub fn config(&self) -> PlacesConfig {
        PlacesConfig {
            api_key: Some(API_KEY.to_string()),
            base_url: self.server.uri(),
            request_timeout_secs: 5,
        }
    }

    pub fn client(&self) -> PlacesClient {
        let caller = Arc::new(RemoteCaller::new(&Self::rate_limits()));
        PlacesClient::new(&self.config(), caller).expect("places client")
    }

    /// Answer details requests for `place_id` with `body`
    pub async fn details(&self, place_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/places/{}", place_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer details requests for `place_id` with a bare status
    pub async fn details_status(&self, place_id: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/places/{}", place_id)))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Every text search finds `place_id`
    pub async fn search_hit(&self, place_id: &str, name: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/places:searchText"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "places": [{
                    "id": place_id,
                    "displayName": { "text": name },
                    "formattedAddress": "1 Main Street",
                    "googleMapsUri": format!("https://maps.example/{}", place_id)
                }]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == request_path)
            .count()
    }
}
