//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.
//! All factories create real objects, not mocks.

use chrono::{Duration, Utc};
use review_monitor::core::models::{Company, CustomerEmail, ImportRow};
use serde_json::{Value, json};

/// Factory for creating test companies
pub struct CompanyFactory;

impl CompanyFactory {
    /// Active company with a place id and a predictable id
    pub fn with_place(id: &str, name: &str, place_id: &str) -> Company {
        let mut company = Company::new(name).with_place_id(place_id);
        company.id = id.to_string();
        company
    }

    /// Company the review jobs skip
    pub fn without_place(id: &str, name: &str) -> Company {
        let mut company = Company::new(name);
        company.id = id.to_string();
        company
    }

    pub fn import_row(name: &str, place_id: Option<&str>) -> ImportRow {
        let mut row = ImportRow::new(name);
        row.place_id = place_id.map(str::to_string);
        row
    }

    pub fn customer(company_name: &str, email: &str) -> CustomerEmail {
        CustomerEmail {
            company_name: company_name.to_string(),
            email: email.to_string(),
            google_maps_url: format!("https://maps.example/{}", company_name),
            bad_review_count: 2,
            average_rating: 2.5,
            ..Default::default()
        }
    }
}

/// Builder for one review in the Places API wire format
pub struct ReviewJson {
    name: String,
    rating: u8,
    days_ago: i64,
    author: Option<String>,
}

impl ReviewJson {
    pub fn new(name: &str, rating: u8) -> Self {
        Self {
            name: name.to_string(),
            rating,
            days_ago: 1,
            author: None,
        }
    }

    pub fn days_ago(mut self, days: i64) -> Self {
        self.days_ago = days;
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn build(&self) -> Value {
        let mut review = json!({
            "name": format!("places/x/reviews/{}", self.name),
            "rating": self.rating,
            "text": { "text": format!("review {}", self.name), "languageCode": "en" },
            "publishTime": (Utc::now() - Duration::days(self.days_ago)).to_rfc3339(),
        });
        if let Some(author) = &self.author {
            review["authorAttribution"] = json!({ "displayName": author });
        }
        review
    }
}

/// Place details body as the Places API answers it
pub fn place_details(rating: f64, reviews: &[ReviewJson]) -> Value {
    json!({
        "rating": rating,
        "userRatingCount": reviews.len() * 10,
        "reviews": reviews.iter().map(ReviewJson::build).collect::<Vec<_>>(),
    })
}
