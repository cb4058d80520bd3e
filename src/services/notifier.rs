//! Outbound notifications

use crate::core::models::{CustomerEmail, ReviewMonitorReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::info;

/// Delivers outreach mail and monitor reports
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Outreach mail to one customer; `to` may differ from the customer address in test mode
    async fn send_outreach(&self, to: &str, customer: &CustomerEmail) -> Result<()>;

    async fn send_report(
        &self,
        to: &str,
        monitor_name: &str,
        report: &ReviewMonitorReport,
    ) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub to: String,
    pub subject: String,
}

/// Deliveries a [`LogNotifier`] keeps by default
pub const DEFAULT_DELIVERY_HISTORY: usize = 100;

/// Sender that writes every delivery to the log and remembers the latest ones
pub struct LogNotifier {
    deliveries: Mutex<VecDeque<Delivery>>,
    history: usize,
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::with_history(DEFAULT_DELIVERY_HISTORY)
    }
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `history` deliveries; older ones are dropped first
    pub fn with_history(history: usize) -> Self {
        Self {
            deliveries: Mutex::new(VecDeque::new()),
            history: history.max(1),
        }
    }

    /// Remembered deliveries, oldest first
    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().iter().cloned().collect()
    }

    fn record(&self, to: &str, subject: String) {
        info!(to, subject = %subject, "Notification delivered");
        let mut deliveries = self.deliveries.lock();
        while deliveries.len() >= self.history {
            deliveries.pop_front();
        }
        deliveries.push_back(Delivery {
            to: to.to_string(),
            subject,
        });
    }
}

#[async_trait]
impl NotificationSender for LogNotifier {
    async fn send_outreach(&self, to: &str, customer: &CustomerEmail) -> Result<()> {
        self.record(
            to,
            format!(
                "{}: {} reviews need attention",
                customer.greeting_name(),
                customer.bad_review_count
            ),
        );
        Ok(())
    }

    async fn send_report(
        &self,
        to: &str,
        monitor_name: &str,
        report: &ReviewMonitorReport,
    ) -> Result<()> {
        self.record(
            to,
            format!(
                "{}: {} bad reviews across {} companies",
                monitor_name, report.total_bad_reviews, report.companies_with_issues
            ),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(n: usize) -> CustomerEmail {
        CustomerEmail {
            company_name: format!("Company {}", n),
            email: format!("owner{}@example.com", n),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_delivery_history_is_bounded() {
        let notifier = LogNotifier::with_history(3);
        for n in 0..5 {
            let c = customer(n);
            notifier.send_outreach(&c.email, &c).await.unwrap();
        }

        let kept: Vec<String> = notifier.deliveries().into_iter().map(|d| d.to).collect();
        assert_eq!(
            kept,
            vec!["owner2@example.com", "owner3@example.com", "owner4@example.com"]
        );
    }

    #[tokio::test]
    async fn test_default_history_keeps_latest_hundred() {
        let notifier = LogNotifier::new();
        let c = customer(0);
        for _ in 0..DEFAULT_DELIVERY_HISTORY + 20 {
            notifier.send_outreach(&c.email, &c).await.unwrap();
        }
        assert_eq!(notifier.deliveries().len(), DEFAULT_DELIVERY_HISTORY);
    }
}
