//! Reviews and review filtering

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// `{company_id}_{source review name}`
    pub id: String,
    pub company_id: String,
    pub author_name: String,
    /// 1 to 5
    pub rating: u8,
    pub text: Option<String>,
    pub time: DateTime<Utc>,
    pub author_url: Option<String>,
    pub profile_photo_url: Option<String>,
    pub relative_time: Option<String>,
    pub language: Option<String>,
}

/// Reviews of one company as returned by a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyReviewData {
    pub company_id: String,
    pub company_name: String,
    pub average_rating: f64,
    pub total_reviews: usize,
    /// Newest first
    pub reviews: Vec<Review>,
    pub last_updated: DateTime<Utc>,
}

/// Mean rating, 0 for no reviews
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64
}

/// Inclusive bounds on review time and rating
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        self.from_date.is_none_or(|from| review.time >= from)
            && self.to_date.is_none_or(|to| review.time <= to)
            && self.min_rating.is_none_or(|min| review.rating >= min)
            && self.max_rating.is_none_or(|max| review.rating <= max)
    }

    /// Keep the matching reviews, newest first, and recompute the totals over them
    pub fn apply(&self, data: CompanyReviewData) -> CompanyReviewData {
        let mut reviews: Vec<Review> = data
            .reviews
            .into_iter()
            .filter(|r| self.matches(r))
            .collect();
        reviews.sort_by(|a, b| b.time.cmp(&a.time));

        CompanyReviewData {
            average_rating: average_rating(&reviews),
            total_reviews: reviews.len(),
            reviews,
            ..data
        }
    }
}
