//! Places API client

use super::types::{PlaceDetails, PlaceMatch, SearchTextResponse};
use crate::config::PlacesConfig;
use crate::core::models::{Company, CompanyReviewData, ReviewFilter};
use crate::core::rate_limiter::RemoteCaller;
use crate::utils::error::{MonitorError, Result};
use crate::utils::logging::redact;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const REVIEW_FIELDS: &str = "reviews,rating,userRatingCount";
const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.rating,places.userRatingCount,places.googleMapsUri";
/// Well known place used to check the API key
const KNOWN_PLACE_ID: &str = "ChIJj61dQgK6j4AR4GeTYWZsKWw";

#[derive(Clone)]
pub struct PlacesClient {
    http: Client,
    caller: Arc<RemoteCaller>,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesClient {
    pub fn new(config: &PlacesConfig, caller: Arc<RemoteCaller>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            caller,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn caller(&self) -> &Arc<RemoteCaller> {
        &self.caller
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| MonitorError::config("Google Places API key not configured"))
    }

    /// Current reviews, overall rating and rating count of a company's place
    pub async fn get_reviews(&self, company: &Company) -> Result<CompanyReviewData> {
        let key = self.api_key()?;
        let place_id = company.place_id().ok_or_else(|| {
            MonitorError::validation(format!("Company {} does not have a place id", company.name))
        })?;

        debug!(company = %company.name, place_id, "Fetching reviews");
        let url = format!("{}/v1/places/{}", self.base_url, place_id);
        let response = self
            .call(|| {
                self.http
                    .get(&url)
                    .header(API_KEY_HEADER, key)
                    .query(&[("fields", REVIEW_FIELDS)])
            })
            .await?;
        let details: PlaceDetails = read_json(response).await?;

        let now = Utc::now();
        let mut reviews: Vec<_> = details
            .reviews
            .into_iter()
            .map(|r| r.into_review(&company.id, now))
            .collect();
        reviews.sort_by(|a, b| b.time.cmp(&a.time));

        info!(company = %company.name, reviews = reviews.len(), "Fetched reviews");
        Ok(CompanyReviewData {
            company_id: company.id.clone(),
            company_name: company.name.clone(),
            average_rating: details.rating.unwrap_or_default(),
            total_reviews: details.user_rating_count.unwrap_or(reviews.len()),
            reviews,
            last_updated: now,
        })
    }

    /// Reviews narrowed by `filter`, with the average recomputed over what is left
    pub async fn get_filtered_reviews(
        &self,
        company: &Company,
        filter: &ReviewFilter,
    ) -> Result<CompanyReviewData> {
        let all = self.get_reviews(company).await?;
        let fetched = all.reviews.len();
        let filtered = filter.apply(all);
        debug!(
            company = %company.name,
            kept = filtered.total_reviews,
            fetched,
            "Filtered reviews"
        );
        Ok(filtered)
    }

    /// First text search hit for `name`, optionally narrowed by `location`
    pub async fn search_place(&self, name: &str, location: Option<&str>) -> Result<Option<PlaceMatch>> {
        let key = self.api_key()?;
        let query = match location.map(str::trim).filter(|l| !l.is_empty()) {
            Some(location) => format!("{} {}", name.trim(), location),
            None => name.trim().to_string(),
        };
        if query.is_empty() {
            return Err(MonitorError::validation("search text is empty"));
        }

        let url = format!("{}/v1/places:searchText", self.base_url);
        let body = json!({ "textQuery": query });
        let response = self
            .call(|| {
                self.http
                    .post(&url)
                    .header(API_KEY_HEADER, key)
                    .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
                    .json(&body)
            })
            .await?;
        let results: SearchTextResponse = read_json(response).await?;

        let found = results.places.into_iter().find_map(|hit| hit.into_match());
        debug!(query = %query, found = found.is_some(), "Place search");
        Ok(found)
    }

    /// Whether the configured key can read a well known place
    pub async fn test_connection(&self) -> bool {
        let Ok(key) = self.api_key() else {
            warn!("Google Places API key not configured");
            return false;
        };

        let url = format!("{}/v1/places/{}", self.base_url, KNOWN_PLACE_ID);
        match self
            .call(|| {
                self.http
                    .get(&url)
                    .header(API_KEY_HEADER, key)
                    .query(&[("fields", "displayName")])
            })
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "Places API connection test failed");
                false
            }
        }
    }

    /// Send through the remote caller; server errors are retried as transient
    async fn call<B>(&self, build: B) -> Result<Response>
    where
        B: Fn() -> RequestBuilder,
    {
        let response = self
            .caller
            .execute(|| {
                let request = build();
                async move {
                    let response = request.send().await?;
                    if response.status().is_server_error() {
                        return Err(MonitorError::external(format!(
                            "Places API returned {}",
                            response.status()
                        )));
                    }
                    Ok(response)
                }
            })
            .await?;

        self.ensure_success(response).await
    }

    /// Error for a non-success answer; the body excerpt never carries the key
    async fn ensure_success(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let mut detail: String = body.chars().take(200).collect();
        if let Some(key) = self.api_key.as_deref() {
            detail = redact(&detail, key);
        }
        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => {
                MonitorError::rate_limit("Places API is still throttling after all retries")
            }
            StatusCode::NOT_FOUND => {
                MonitorError::not_found(format!("Place not found: {}", detail))
            }
            _ => MonitorError::external(format!("Places API returned {}: {}", status, detail)),
        })
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
