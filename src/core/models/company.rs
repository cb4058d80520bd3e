//! Monitored companies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business whose Google reviews are monitored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    /// Google Places identifier; companies without one are skipped by review jobs
    pub place_id: Option<String>,
    pub google_maps_url: Option<String>,
    pub email_address: Option<String>,
    pub is_active: bool,
    pub is_current_customer: bool,
    pub last_updated: DateTime<Utc>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    /// 0.0 to 5.0
    pub overall_rating: Option<f64>,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            place_id: None,
            google_maps_url: None,
            email_address: None,
            is_active: true,
            is_current_customer: false,
            last_updated: Utc::now(),
            address: None,
            phone_number: None,
            website: None,
            overall_rating: None,
        }
    }

    pub fn with_place_id(mut self, place_id: impl Into<String>) -> Self {
        self.place_id = Some(place_id.into());
        self
    }

    /// Trimmed place id, `None` when missing or blank
    pub fn place_id(&self) -> Option<&str> {
        self.place_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Active and linked to a place
    pub fn is_monitorable(&self) -> bool {
        self.is_active && self.place_id().is_some()
    }
}

/// One company to import, as read from an uploaded sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRow {
    pub name: String,
    /// When absent the place is looked up by name and `location`
    pub place_id: Option<String>,
    pub google_maps_url: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub email_address: Option<String>,
    pub location: Option<String>,
    pub is_current_customer: bool,
}

impl ImportRow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn into_company(self, place_id: String) -> Company {
        let mut company = Company::new(self.name.trim()).with_place_id(place_id);
        company.google_maps_url = self.google_maps_url;
        company.email_address = self.email_address;
        company.address = self.address;
        company.phone_number = self.phone_number;
        company.website = self.website;
        company.is_current_customer = self.is_current_customer;
        company
    }
}
