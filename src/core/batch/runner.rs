//! Drives one batch job over its items and publishes progress

use super::types::{BatchJob, ExecutionMode, ItemOutcome, JobSummary, OutcomeKind, WorkItem};
use crate::core::progress::{JobStatus, ProgressSink, ProgressSnapshot, SessionToken};
use crate::utils::error::Result;
use futures::FutureExt;
use futures::future::join_all;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Runs jobs and reports their progress to a [`ProgressSink`].
///
/// One item failing or panicking never ends the run. Only `prepare` or
/// `finish` failing does, in which case the last snapshot is an `Error` one.
pub struct BatchRunner {
    sink: Arc<dyn ProgressSink>,
    recent_limit: usize,
}

impl BatchRunner {
    pub fn new(sink: Arc<dyn ProgressSink>, recent_limit: usize) -> Self {
        Self {
            sink,
            recent_limit: recent_limit.max(1),
        }
    }

    pub async fn run<J: BatchJob>(
        &self,
        job: Arc<J>,
        items: Vec<J::Item>,
        mode: ExecutionMode,
        token: SessionToken,
    ) -> JobSummary {
        let mut tracker = Tracker::new(
            self.sink.clone(),
            token.clone(),
            items.len(),
            self.recent_limit,
        );
        tracker.snapshot.redirect_url = job.redirect_url(&token);
        tracker.publish(JobStatus::Starting, "Starting...", job.context());

        info!(
            session_id = %token,
            job = job.name(),
            items = items.len(),
            mode = ?mode,
            "🚀 Batch job started"
        );

        match self.drive(&job, items, mode, &mut tracker).await {
            Ok(summary) => {
                info!(
                    session_id = %token,
                    job = job.name(),
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    duplicates = summary.duplicates,
                    elapsed_ms = summary.elapsed.as_millis() as u64,
                    "✅ Batch job complete"
                );
                summary
            }
            Err(e) => {
                error!(session_id = %token, job = job.name(), error = %e, "Batch job failed");
                let message = format!("Error: {}", e);
                tracker.fail(&message);
                tracker.summary(JobStatus::Error, Some(message))
            }
        }
    }

    async fn drive<J: BatchJob>(
        &self,
        job: &Arc<J>,
        items: Vec<J::Item>,
        mode: ExecutionMode,
        tracker: &mut Tracker,
    ) -> Result<JobSummary> {
        job.prepare().await?;

        let outputs = match mode {
            ExecutionMode::Sequential => Self::run_sequential(job, items, tracker).await,
            ExecutionMode::Chunked {
                chunk_size,
                inter_chunk_delay,
            } => Self::run_chunked(job, items, chunk_size, inter_chunk_delay, tracker).await,
        };

        let mut summary = tracker.summary(JobStatus::Complete, None);
        if let Some(payload) = job.finish(outputs, &summary).await? {
            summary.report = Some(self.sink.attach_report(&tracker.token, payload));
        }
        tracker.complete(job.context());
        summary.elapsed = tracker.started.elapsed();

        Ok(summary)
    }

    async fn run_sequential<J: BatchJob>(
        job: &Arc<J>,
        items: Vec<J::Item>,
        tracker: &mut Tracker,
    ) -> Vec<J::Output> {
        let total = items.len();
        let mut outputs = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            let label = item.label();
            tracker.publish(
                job.active_status(),
                format!("{} ({}/{})", label, index + 1, total),
                job.context(),
            );

            let outcome = match AssertUnwindSafe(job.process(item)).catch_unwind().await {
                Ok(result) => settle(&tracker.token, &label, result),
                Err(_) => panicked(&tracker.token, &label),
            };
            outputs.extend(tracker.record(outcome));
        }

        outputs
    }

    async fn run_chunked<J: BatchJob>(
        job: &Arc<J>,
        items: Vec<J::Item>,
        chunk_size: usize,
        inter_chunk_delay: std::time::Duration,
        tracker: &mut Tracker,
    ) -> Vec<J::Output> {
        let chunk_size = chunk_size.max(1);
        let total_chunks = items.len().div_ceil(chunk_size);
        let mut outputs = Vec::new();
        let mut remaining = items.into_iter().peekable();
        let mut chunk_number = 0;

        while remaining.peek().is_some() {
            chunk_number += 1;
            let (labels, handles): (Vec<_>, Vec<_>) = remaining
                .by_ref()
                .take(chunk_size)
                .map(|item| {
                    let label = item.label();
                    let job = job.clone();
                    (label, tokio::spawn(async move { job.process(item).await }))
                })
                .unzip();

            debug!(
                session_id = %tracker.token,
                chunk = chunk_number,
                of = total_chunks,
                size = labels.len(),
                "Chunk dispatched"
            );

            let results = join_all(handles).await;
            for (label, joined) in labels.iter().zip(results) {
                let outcome = match joined {
                    Ok(result) => settle(&tracker.token, label, result),
                    Err(_) => panicked(&tracker.token, label),
                };
                outputs.extend(tracker.record(outcome));
            }

            tracker.publish(
                job.active_status(),
                format!("Chunk {}/{} complete", chunk_number, total_chunks),
                job.context(),
            );

            if remaining.peek().is_some() && !inter_chunk_delay.is_zero() {
                tokio::time::sleep(inter_chunk_delay).await;
            }
        }

        outputs
    }
}

fn settle<O>(token: &SessionToken, label: &str, result: Result<ItemOutcome<O>>) -> ItemOutcome<O> {
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(session_id = %token, item = label, error = %e, "Item failed");
            ItemOutcome::failed(format!("✗ {}: {}", label, e))
        }
    }
}

fn panicked<O>(token: &SessionToken, label: &str) -> ItemOutcome<O> {
    error!(session_id = %token, item = label, "Item panicked");
    ItemOutcome::failed(format!("✗ {}: unexpected failure", label))
}

/// Owns the snapshot of one run and the only writer of it
struct Tracker {
    sink: Arc<dyn ProgressSink>,
    token: SessionToken,
    snapshot: ProgressSnapshot,
    started: Instant,
    recent_limit: usize,
}

impl Tracker {
    fn new(
        sink: Arc<dyn ProgressSink>,
        token: SessionToken,
        total: usize,
        recent_limit: usize,
    ) -> Self {
        let mut snapshot = ProgressSnapshot::initializing(total);
        // keep the submission time when the engine already wrote a snapshot
        if let Some(submitted) = sink.latest(&token).filter(|s| !s.is_complete) {
            snapshot.start_time = submitted.start_time;
        }
        Self {
            sink,
            token,
            snapshot,
            started: Instant::now(),
            recent_limit,
        }
    }

    fn record<O>(&mut self, outcome: ItemOutcome<O>) -> Option<O> {
        let snapshot = &mut self.snapshot;
        snapshot.processed_items += 1;
        match outcome.kind {
            OutcomeKind::Succeeded => snapshot.successful_items += 1,
            OutcomeKind::Failed => snapshot.failed_items += 1,
            OutcomeKind::Duplicate => {
                snapshot.failed_items += 1;
                snapshot.duplicate_items += 1;
            }
        }
        snapshot.push_recent(outcome.label, self.recent_limit);
        outcome.output
    }

    fn refresh_rates(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f64();
        let processed = self.snapshot.processed_items as f64;

        self.snapshot.estimated_remaining_seconds = if processed > 0.0 {
            (elapsed / processed * self.snapshot.remaining_items() as f64).floor() as u64
        } else {
            0
        };
        self.snapshot.requests_per_minute = if elapsed > 0.0 {
            processed / (elapsed / 60.0)
        } else {
            0.0
        };
    }

    fn publish(&mut self, status: JobStatus, current_item: impl Into<String>, context: String) {
        self.refresh_rates();
        self.snapshot.status = status;
        self.snapshot.current_item = current_item.into();
        self.snapshot.rate_limit_info = context;
        self.sink.publish(&self.token, self.snapshot.clone());
    }

    fn complete(&mut self, context: String) {
        self.refresh_rates();
        self.snapshot.status = JobStatus::Complete;
        self.snapshot.is_complete = true;
        self.snapshot.estimated_remaining_seconds = 0;
        self.snapshot.current_item = "Complete".to_string();
        self.snapshot.rate_limit_info = context;
        self.sink.publish(&self.token, self.snapshot.clone());
    }

    fn fail(&mut self, message: &str) {
        self.refresh_rates();
        self.snapshot.fail(message);
        self.sink.publish(&self.token, self.snapshot.clone());
    }

    fn summary(&self, status: JobStatus, error: Option<String>) -> JobSummary {
        JobSummary {
            total: self.snapshot.total_items,
            processed: self.snapshot.processed_items,
            succeeded: self.snapshot.successful_items,
            failed: self.snapshot.failed_items,
            duplicates: self.snapshot.duplicate_items,
            elapsed: self.started.elapsed(),
            status,
            error,
            report: None,
        }
    }
}
