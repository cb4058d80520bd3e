//! Remote caller with concurrency cap, sliding window and backoff

use super::types::RateLimitSignal;
use super::window::SlidingWindow;
use crate::config::RateLimitConfig;
use crate::utils::error::{MonitorError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Wraps outbound calls to a throttled API.
///
/// One instance is shared by every job in the process: the slots and the
/// window are global to all concurrent callers. Cloning shares the state.
#[derive(Clone)]
pub struct RemoteCaller {
    slots: Arc<Semaphore>,
    max_slots: usize,
    window: Arc<SlidingWindow>,
    max_retries: u32,
    base_backoff: Duration,
}

impl RemoteCaller {
    pub fn new(config: &RateLimitConfig) -> Self {
        let max_slots = config.max_concurrency.max(1);
        Self {
            slots: Arc::new(Semaphore::new(max_slots)),
            max_slots,
            window: Arc::new(SlidingWindow::new(
                config.max_requests_per_window as usize,
                config.window(),
            )),
            max_retries: config.max_retries,
            base_backoff: config.base_backoff(),
        }
    }

    /// Backoff before retry `attempt` (1-based): `base * 2^attempt`
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    /// Run `op` with the configured retry budget
    pub async fn execute<F, Fut, R>(&self, op: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
        R: RateLimitSignal,
    {
        self.execute_with_retries(self.max_retries, op).await
    }

    /// Run `op`, retrying throttled answers and transient errors up to `max_retries` times.
    ///
    /// A throttled answer that is still throttled after the last retry is
    /// returned as-is for the caller to inspect. A transient error after the
    /// last retry is returned as the error.
    pub async fn execute_with_retries<F, Fut, R>(&self, max_retries: u32, mut op: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R>>,
        R: RateLimitSignal,
    {
        // Held across all attempts; dropped on every return path
        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|e| MonitorError::internal(format!("Remote call slots closed: {}", e)))?;

        let mut attempt = 0u32;
        loop {
            let waited = self.window.acquire().await;
            if !waited.is_zero() {
                debug!(waited_ms = waited.as_millis() as u64, "Held back by sliding window");
            }

            match op().await {
                Ok(response) if response.is_rate_limited() && attempt < max_retries => {
                    attempt += 1;
                    let delay = self.backoff_for(attempt);
                    warn!(
                        attempt,
                        max_retries,
                        delay_secs = delay.as_secs_f64(),
                        "Remote API answered too many requests, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    if response.is_rate_limited() {
                        warn!(attempt, "Remote API still throttling after all retries");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_transient() && attempt < max_retries => {
                    attempt += 1;
                    let delay = self.backoff_for(attempt);
                    warn!(
                        attempt,
                        max_retries,
                        delay_secs = delay.as_secs_f64(),
                        error = %e,
                        "Remote call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Diagnostic line shown in progress snapshots
    pub fn describe(&self) -> String {
        let usage = self.window.usage();
        format!(
            "{}/{} requests in the last {}s, {}/{} call slots busy",
            usage.current,
            usage.limit,
            usage.window_secs,
            self.busy_slots(),
            self.max_slots
        )
    }

    pub fn busy_slots(&self) -> usize {
        self.max_slots - self.slots.available_permits()
    }

    pub fn window(&self) -> &SlidingWindow {
        &self.window
    }
}
