//! Expiring progress store

use super::types::{JobReport, ProgressSnapshot, SessionToken};
use crate::config::ProgressConfig;
use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

/// Where a running job writes its progress.
///
/// The runner is the only writer for its token, so implementations need no
/// merging: the latest write wins.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, token: &SessionToken, snapshot: ProgressSnapshot);

    /// Store the job's result payload and hand back the shared copy
    fn attach_report(&self, token: &SessionToken, report: serde_json::Value) -> JobReport;

    /// Last snapshot written for `token`, when the sink can read back
    fn latest(&self, _token: &SessionToken) -> Option<ProgressSnapshot> {
        None
    }
}

struct Stamped<T> {
    value: T,
    written_at: Instant,
}

impl<T> Stamped<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            written_at: Instant::now(),
        }
    }

    fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.written_at)
    }
}

/// Session token → latest snapshot, and session token → result payload.
///
/// Entries stop being readable once older than the retention window and are
/// removed by the periodic sweep. Snapshots of unfinished jobs get the longer
/// active retention so a slow run is not evicted under its poller.
pub struct ProgressStore {
    progress: DashMap<SessionToken, Stamped<ProgressSnapshot>>,
    reports: DashMap<SessionToken, Stamped<JobReport>>,
    retention: Duration,
    active_retention: Duration,
    cleanup_interval: Duration,
}

impl ProgressStore {
    pub fn new(config: &ProgressConfig) -> Self {
        Self {
            progress: DashMap::new(),
            reports: DashMap::new(),
            retention: config.retention(),
            active_retention: config.active_retention(),
            cleanup_interval: config.cleanup_interval(),
        }
    }

    /// Issue a token for a new job; nothing is stored until the first update
    pub fn create_session(&self) -> SessionToken {
        SessionToken::issue()
    }

    pub fn update_progress(&self, token: &SessionToken, snapshot: ProgressSnapshot) {
        self.progress.insert(token.clone(), Stamped::new(snapshot));
    }

    /// Latest snapshot, or `None` when the token is unknown or expired
    pub fn get_progress(&self, token: &SessionToken) -> Option<ProgressSnapshot> {
        let entry = self.progress.get(token)?;
        if self.progress_expired(&entry, Instant::now()) {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn clear_progress(&self, token: &SessionToken) {
        self.progress.remove(token);
    }

    pub fn store_report(&self, token: &SessionToken, report: serde_json::Value) -> JobReport {
        let report: JobReport = Arc::new(report);
        self.reports
            .insert(token.clone(), Stamped::new(report.clone()));
        report
    }

    pub fn get_report(&self, token: &SessionToken) -> Option<JobReport> {
        let entry = self.reports.get(token)?;
        if entry.age(Instant::now()) > self.retention {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Read the report once; it is removed by this call
    pub fn take_report(&self, token: &SessionToken) -> Option<JobReport> {
        let (_, entry) = self.reports.remove(token)?;
        if entry.age(Instant::now()) > self.retention {
            return None;
        }
        Some(entry.value)
    }

    pub fn clear_report(&self, token: &SessionToken) {
        self.reports.remove(token);
    }

    /// Drop every expired entry; returns how many snapshots and reports went
    pub fn evict_expired(&self) -> (usize, usize) {
        let now = Instant::now();

        let before = self.progress.len();
        self.progress
            .retain(|_, entry| !self.progress_expired(entry, now));
        let evicted_progress = before.saturating_sub(self.progress.len());

        let before = self.reports.len();
        self.reports
            .retain(|_, entry| entry.age(now) <= self.retention);
        let evicted_reports = before.saturating_sub(self.reports.len());

        if evicted_progress > 0 || evicted_reports > 0 {
            debug!(
                evicted_progress,
                evicted_reports, "Evicted expired progress sessions"
            );
        }
        (evicted_progress, evicted_reports)
    }

    /// Sweep on a fixed timer until the store is dropped
    pub fn start_cleanup_task(self: &Arc<Self>) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        let period = self.cleanup_interval;
        info!(
            interval_secs = period.as_secs(),
            "Starting progress cleanup task"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                match store.upgrade() {
                    Some(store) => {
                        store.evict_expired();
                    }
                    None => break,
                }
            }
        })
    }

    /// Number of live snapshot entries, expired ones included until swept
    pub fn session_count(&self) -> usize {
        self.progress.len()
    }

    fn progress_expired(&self, entry: &Stamped<ProgressSnapshot>, now: Instant) -> bool {
        let limit = if entry.value.is_complete {
            self.retention
        } else {
            self.active_retention
        };
        entry.age(now) > limit
    }
}

impl ProgressSink for ProgressStore {
    fn publish(&self, token: &SessionToken, snapshot: ProgressSnapshot) {
        self.update_progress(token, snapshot);
    }

    fn attach_report(&self, token: &SessionToken, report: serde_json::Value) -> JobReport {
        self.store_report(token, report)
    }

    fn latest(&self, token: &SessionToken) -> Option<ProgressSnapshot> {
        self.get_progress(token)
    }
}
