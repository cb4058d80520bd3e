//! Customer outreach mail

use crate::core::batch::{BatchJob, ItemOutcome, JobSummary};
use crate::core::models::{CustomerEmail, OutreachResult};
use crate::core::progress::JobStatus;
use crate::core::rate_limiter::SlidingWindow;
use crate::services::notifier::NotificationSender;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Recipient of one outreach attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Delivered {
    pub email: String,
    pub sent: bool,
}

/// Sends one outreach mail per customer, paced by `throttle`.
///
/// The throttle is shared by every campaign of the process, so concurrent
/// jobs split one mail quota. In test mode every mail goes to the test
/// address instead.
pub struct OutreachEmailJob {
    notifier: Arc<dyn NotificationSender>,
    throttle: Arc<SlidingWindow>,
    test_email: Option<String>,
}

impl OutreachEmailJob {
    pub fn new(
        notifier: Arc<dyn NotificationSender>,
        throttle: Arc<SlidingWindow>,
        test_email: Option<String>,
    ) -> Self {
        Self {
            notifier,
            throttle,
            test_email: test_email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        }
    }

    pub fn is_test_mode(&self) -> bool {
        self.test_email.is_some()
    }
}

#[async_trait]
impl BatchJob for OutreachEmailJob {
    type Item = CustomerEmail;
    type Output = Delivered;

    fn name(&self) -> &'static str {
        "outreach_email"
    }

    async fn process(&self, customer: CustomerEmail) -> Result<ItemOutcome<Delivered>> {
        let email = customer.email.trim().to_string();
        if !email.contains('@') {
            return Ok(ItemOutcome::failed_with(
                format!("✗ {}: invalid email address", customer.company_name),
                Delivered { email, sent: false },
            ));
        }

        let to = self.test_email.as_deref().unwrap_or(&email);
        self.throttle.acquire().await;

        Ok(match self.notifier.send_outreach(to, &customer).await {
            Ok(()) => ItemOutcome::with_output(
                format!("✓ {}", email),
                Delivered { email, sent: true },
            ),
            Err(e) => {
                warn!(email = %email, error = %e, "Outreach mail failed");
                ItemOutcome::failed_with(
                    format!("✗ {}: {}", email, e),
                    Delivered { email, sent: false },
                )
            }
        })
    }

    async fn finish(
        &self,
        outputs: Vec<Delivered>,
        summary: &JobSummary,
    ) -> Result<Option<serde_json::Value>> {
        let (sent, failed): (Vec<Delivered>, Vec<Delivered>) =
            outputs.into_iter().partition(|d| d.sent);
        let result = OutreachResult {
            total_emails: summary.total,
            success_count: summary.succeeded,
            fail_count: summary.failed,
            successful_emails: sent.into_iter().map(|d| d.email).collect(),
            failed_emails: failed.into_iter().map(|d| d.email).collect(),
            is_test_mode: self.is_test_mode(),
            test_email: self.test_email.clone(),
        };
        Ok(Some(serde_json::to_value(result)?))
    }

    fn context(&self) -> String {
        let usage = self.throttle.usage();
        format!("{}/{} emails in the last minute", usage.current, usage.limit)
    }

    fn active_status(&self) -> JobStatus {
        JobStatus::Sending
    }
}
