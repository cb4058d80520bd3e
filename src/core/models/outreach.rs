//! Customer outreach

use serde::{Deserialize, Serialize};

/// One outreach recipient
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerEmail {
    pub company_name: String,
    /// Used in the greeting instead of the company name when set
    pub contact_name: Option<String>,
    pub email: String,
    pub google_maps_url: String,
    pub bad_review_count: usize,
    pub average_rating: f64,
}

impl CustomerEmail {
    pub fn greeting_name(&self) -> &str {
        match self.contact_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.company_name,
        }
    }
}

/// Payload of a finished outreach run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachResult {
    pub total_emails: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub successful_emails: Vec<String>,
    pub failed_emails: Vec<String>,
    pub is_test_mode: bool,
    pub test_email: Option<String>,
}
