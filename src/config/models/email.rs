//! Outreach email configuration

use super::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailConfig {
    /// Outreach emails admitted per minute
    #[serde(default = "default_emails_per_minute")]
    pub max_per_minute: u32,
    /// Address that receives every outreach email when a campaign runs in test mode
    #[serde(default)]
    pub test_email: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            max_per_minute: default_emails_per_minute(),
            test_email: None,
        }
    }
}

impl EmailConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_per_minute == 0 {
            return Err("max_per_minute must be greater than 0".to_string());
        }
        if let Some(address) = &self.test_email {
            if !address.contains('@') {
                return Err(format!("test_email is not an email address: {}", address));
            }
        }
        Ok(())
    }
}
