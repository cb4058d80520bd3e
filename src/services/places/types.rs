//! Places API wire types

use crate::core::models::Review;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlaceDetails {
    #[serde(default)]
    pub reviews: Vec<PlaceReview>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlaceReview {
    /// Resource name, `places/{place}/reviews/{review}`
    pub name: Option<String>,
    pub relative_publish_time_description: Option<String>,
    #[serde(default)]
    pub rating: u8,
    pub text: Option<LocalizedText>,
    pub author_attribution: Option<AuthorAttribution>,
    /// RFC 3339
    pub publish_time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LocalizedText {
    pub text: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthorAttribution {
    pub display_name: Option<String>,
    pub uri: Option<String>,
    pub photo_uri: Option<String>,
}

impl PlaceReview {
    /// Convert to a stored review; an unparsable publish time falls back to `now`
    pub fn into_review(self, company_id: &str, now: DateTime<Utc>) -> Review {
        let time = self
            .publish_time
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now);
        let name = self.name.unwrap_or_else(|| Uuid::new_v4().to_string());
        let (text, language) = match self.text {
            Some(text) => (text.text, text.language_code),
            None => (None, None),
        };
        let author = self.author_attribution;

        Review {
            id: format!("{}_{}", company_id, name),
            company_id: company_id.to_string(),
            author_name: author
                .as_ref()
                .and_then(|a| a.display_name.clone())
                .unwrap_or_else(|| "Anonymous".to_string()),
            rating: self.rating,
            text,
            time,
            author_url: author.as_ref().and_then(|a| a.uri.clone()),
            profile_photo_url: author.and_then(|a| a.photo_uri),
            relative_time: self.relative_publish_time_description,
            language,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchHit {
    pub id: Option<String>,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<usize>,
    pub google_maps_uri: Option<String>,
}

/// Best text search hit for a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceMatch {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub google_maps_url: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<usize>,
}

impl SearchHit {
    pub fn into_match(self) -> Option<PlaceMatch> {
        let place_id = self.id.filter(|id| !id.trim().is_empty())?;
        Some(PlaceMatch {
            place_id,
            name: self.display_name.and_then(|n| n.text),
            formatted_address: self.formatted_address,
            google_maps_url: self.google_maps_uri,
            rating: self.rating,
            user_rating_count: self.user_rating_count,
        })
    }
}
