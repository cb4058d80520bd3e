//! Scheduled review monitors

use super::jobs::ReviewReportJob;
use super::notifier::NotificationSender;
use super::places::PlacesClient;
use crate::core::batch::{BatchEngine, ExecutionMode};
use crate::core::models::{
    Company, ExecutionStatus, MonitorExecution, ReportPeriod, ReviewMonitorReport,
    ScheduledMonitor,
};
use crate::core::progress::JobStatus;
use crate::storage::RecordStore;
use crate::utils::error::{MonitorError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Runs due monitors: builds their bad review report through the batch
/// runner, mails it and records the execution.
pub struct MonitorScheduler {
    store: Arc<dyn RecordStore>,
    places: PlacesClient,
    notifier: Arc<dyn NotificationSender>,
    engine: Arc<BatchEngine>,
}

impl MonitorScheduler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        places: PlacesClient,
        notifier: Arc<dyn NotificationSender>,
        engine: Arc<BatchEngine>,
    ) -> Self {
        Self {
            store,
            places,
            notifier,
            engine,
        }
    }

    /// Validate `monitor`, set its first run and store it
    pub async fn create_monitor(
        &self,
        mut monitor: ScheduledMonitor,
        now: DateTime<Utc>,
    ) -> Result<ScheduledMonitor> {
        monitor.next_run_at = Some(monitor.next_run_after(now)?);
        self.store.save_monitor(monitor.clone()).await?;
        info!(monitor = %monitor.name, next_run_at = ?monitor.next_run_at, "Monitor scheduled");
        Ok(monitor)
    }

    /// Replace the settings of monitor `id` with those of `update`.
    ///
    /// Identity, creation time and run history stay; the next run is
    /// recomputed from the new schedule.
    pub async fn update_monitor(
        &self,
        id: &str,
        update: ScheduledMonitor,
        now: DateTime<Utc>,
    ) -> Result<ScheduledMonitor> {
        let existing = self.find(id).await?;
        let mut monitor = ScheduledMonitor {
            id: existing.id,
            created_at: existing.created_at,
            last_run_at: existing.last_run_at,
            ..update
        };
        if monitor.include_all_companies {
            monitor.company_ids.clear();
        }
        monitor.next_run_at = Some(monitor.next_run_after(now)?);
        self.store.save_monitor(monitor.clone()).await?;
        info!(monitor = %monitor.name, next_run_at = ?monitor.next_run_at, "Monitor updated");
        Ok(monitor)
    }

    /// Pause an active monitor or resume a paused one from `now`
    pub async fn toggle_active(&self, id: &str, now: DateTime<Utc>) -> Result<ScheduledMonitor> {
        let mut monitor = self.find(id).await?;
        monitor.is_active = !monitor.is_active;
        if monitor.is_active {
            monitor.next_run_at = Some(monitor.next_run_after(now)?);
        }
        self.store.save_monitor(monitor.clone()).await?;
        info!(monitor = %monitor.name, active = monitor.is_active, "Monitor toggled");
        Ok(monitor)
    }

    async fn find(&self, id: &str) -> Result<ScheduledMonitor> {
        self.store
            .get_monitor(id)
            .await?
            .ok_or_else(|| MonitorError::not_found(format!("monitor {} not found", id)))
    }

    /// Run every monitor due at `now`; returns how many were recorded.
    ///
    /// A monitor whose run cannot be stored is logged and skipped; the
    /// remaining due monitors still run.
    pub async fn process_due(&self, now: DateTime<Utc>) -> Result<usize> {
        let due = self.store.due_monitors(now).await?;
        if !due.is_empty() {
            info!(count = due.len(), "Scheduled monitors ready to run");
        }

        let mut recorded = 0;
        for monitor in due {
            let name = monitor.name.clone();
            match self.execute(monitor, now).await {
                Ok(_) => recorded += 1,
                Err(e) => error!(monitor = %name, error = %e, "Recording monitor run failed"),
            }
        }
        Ok(recorded)
    }

    /// Run one monitor immediately regardless of its schedule
    pub async fn run_now(&self, monitor_id: &str, now: DateTime<Utc>) -> Result<MonitorExecution> {
        let monitor = self.find(monitor_id).await?;
        self.execute(monitor, now).await
    }

    async fn execute(
        &self,
        mut monitor: ScheduledMonitor,
        now: DateTime<Utc>,
    ) -> Result<MonitorExecution> {
        let period = monitor.period_ending(now);
        let mut execution = MonitorExecution::started(&monitor.id, &period);
        info!(monitor = %monitor.name, "Running scheduled monitor");

        match self.build_report(&monitor, &period).await {
            Ok(report) => {
                execution.companies_checked = report.total_companies_checked;
                execution.companies_with_issues = report.companies_with_issues;
                execution.total_bad_reviews = report.total_bad_reviews;

                match self
                    .notifier
                    .send_report(&monitor.email_address, &monitor.name, &report)
                    .await
                {
                    Ok(()) => execution.email_sent = true,
                    Err(e) => {
                        warn!(monitor = %monitor.name, error = %e, "Monitor report mail failed");
                        execution.email_error = Some(format!("Failed to send email report: {}", e));
                        execution.status = ExecutionStatus::PartialSuccess;
                    }
                }
                monitor.last_run_at = Some(now);
                info!(
                    monitor = %monitor.name,
                    companies_with_issues = report.companies_with_issues,
                    bad_reviews = report.total_bad_reviews,
                    "Scheduled monitor finished"
                );
            }
            Err(e) => {
                error!(monitor = %monitor.name, error = %e, "Scheduled monitor failed");
                execution.status = ExecutionStatus::Failed;
                execution.email_error = Some(e.to_string());
            }
        }

        // advanced on failure too
        match monitor.next_run_after(now) {
            Ok(next) => monitor.next_run_at = Some(next),
            Err(e) => {
                warn!(monitor = %monitor.name, error = %e, "Monitor schedule is invalid, deactivating");
                monitor.is_active = false;
                monitor.next_run_at = None;
            }
        }

        self.store.save_monitor(monitor).await?;
        self.store.record_execution(execution.clone()).await?;
        Ok(execution)
    }

    async fn build_report(
        &self,
        monitor: &ScheduledMonitor,
        period: &ReportPeriod,
    ) -> Result<ReviewMonitorReport> {
        let companies: Vec<Company> = if monitor.include_all_companies {
            self.store.list_companies().await?
        } else {
            self.store.companies_by_ids(&monitor.company_ids).await?
        }
        .into_iter()
        .filter(Company::is_monitorable)
        .collect();

        let job = Arc::new(ReviewReportJob::new(self.places.clone(), *period));
        let token = self.engine.store().create_session();
        let summary = self
            .engine
            .runner()
            .run(job, companies, ExecutionMode::Sequential, token.clone())
            .await;
        // the report is handed over here, nobody polls for it
        self.engine.clear(&token);

        if summary.status != JobStatus::Complete {
            return Err(MonitorError::job(
                summary
                    .error
                    .unwrap_or_else(|| "report job did not complete".to_string()),
            ));
        }
        let payload = summary
            .report
            .ok_or_else(|| MonitorError::internal("report job produced no report"))?;
        Ok(serde_json::from_value((*payload).clone())?)
    }

    /// Check for due monitors every `interval` until the scheduler is dropped
    pub fn start(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let scheduler = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            info!(interval_secs = interval.as_secs(), "Monitor scheduler started");
            loop {
                ticker.tick().await;
                let Some(scheduler) = scheduler.upgrade() else {
                    break;
                };
                if let Err(e) = scheduler.process_due(Utc::now()).await {
                    error!(error = %e, "Processing scheduled monitors failed");
                }
            }
            info!("Monitor scheduler stopped");
        })
    }
}
