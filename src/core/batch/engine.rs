//! Background submission of batch jobs

use super::runner::BatchRunner;
use super::types::{BatchJob, ExecutionMode};
use crate::config::BatchConfig;
use crate::core::progress::{JobReport, ProgressSnapshot, ProgressStore, SessionToken};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Starts jobs in the background and answers progress queries for them
pub struct BatchEngine {
    store: Arc<ProgressStore>,
    runner: Arc<BatchRunner>,
    config: BatchConfig,
}

impl BatchEngine {
    pub fn new(store: Arc<ProgressStore>, config: BatchConfig) -> Self {
        let runner = Arc::new(BatchRunner::new(store.clone(), config.recent_results_limit));
        Self {
            store,
            runner,
            config,
        }
    }

    /// Start `job` in the background and return its token at once.
    ///
    /// An `Initializing` snapshot is stored before this returns, so polling
    /// the token never reports it as unknown while the job is alive.
    pub fn submit<J: BatchJob>(
        &self,
        job: Arc<J>,
        items: Vec<J::Item>,
        mode: ExecutionMode,
    ) -> SessionToken {
        let token = self.store.create_session();
        let name = job.name();

        let mut initial = ProgressSnapshot::initializing(items.len());
        initial.rate_limit_info = job.context();
        initial.redirect_url = job.redirect_url(&token);
        self.store.update_progress(&token, initial);

        info!(session_id = %token, job = name, items = items.len(), "Batch job submitted");

        let runner = self.runner.clone();
        let run_token = token.clone();
        let handle = tokio::spawn(async move { runner.run(job, items, mode, run_token).await });

        let store = self.store.clone();
        let watched = token.clone();
        tokio::spawn(async move {
            match handle.await {
                Ok(summary) => {
                    debug!(session_id = %watched, job = name, status = ?summary.status, "Batch task ended");
                }
                Err(e) => {
                    error!(session_id = %watched, job = name, error = %e, "Batch task aborted");
                    let mut snapshot = store
                        .get_progress(&watched)
                        .unwrap_or_else(|| ProgressSnapshot::initializing(0));
                    if !snapshot.is_complete {
                        snapshot.fail("Error: the job stopped unexpectedly");
                        store.update_progress(&watched, snapshot);
                    }
                }
            }
        });

        token
    }

    pub fn sequential_mode(&self) -> ExecutionMode {
        ExecutionMode::Sequential
    }

    pub fn chunked_mode(&self) -> ExecutionMode {
        ExecutionMode::chunked(&self.config)
    }

    pub fn poll(&self, token: &SessionToken) -> Option<ProgressSnapshot> {
        self.store.get_progress(token)
    }

    /// Result payload of a finished job; readable once
    pub fn take_report(&self, token: &SessionToken) -> Option<JobReport> {
        self.store.take_report(token)
    }

    /// Forget everything stored for `token`
    pub fn clear(&self, token: &SessionToken) {
        self.store.clear_progress(token);
        self.store.clear_report(token);
    }

    pub fn store(&self) -> &Arc<ProgressStore> {
        &self.store
    }

    pub fn runner(&self) -> &Arc<BatchRunner> {
        &self.runner
    }
}
