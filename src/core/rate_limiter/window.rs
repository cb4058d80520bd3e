//! Sliding window admission

use super::types::WindowUsage;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Admits at most `limit` acquisitions in any trailing `window`.
///
/// Callers over the limit are made to wait until the oldest timestamp leaves
/// the window; nothing is ever dropped.
pub struct SlidingWindow {
    limit: usize,
    window: Duration,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl SlidingWindow {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit: limit.max(1),
            window,
            timestamps: Mutex::new(VecDeque::new()),
        }
    }

    /// Per-minute window, as used for outbound email
    pub fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Wait for a free position in the window and record it.
    ///
    /// Returns how long the caller was held back.
    pub async fn acquire(&self) -> Duration {
        let started = Instant::now();
        loop {
            let wait = {
                let now = Instant::now();
                let mut timestamps = self.timestamps.lock();
                Self::prune(&mut timestamps, now, self.window);

                if timestamps.len() < self.limit {
                    timestamps.push_back(now);
                    return now.duration_since(started);
                }

                // Full: the oldest entry decides when the next slot opens
                match timestamps.front() {
                    Some(&oldest) => (oldest + self.window).saturating_duration_since(now),
                    None => Duration::ZERO,
                }
            };

            debug!(
                wait_ms = wait.as_millis() as u64,
                limit = self.limit,
                "Sliding window full, waiting"
            );
            // Re-check after waking; another caller may have taken the slot
            tokio::time::sleep(wait.max(Duration::from_millis(1))).await;
        }
    }

    /// Current usage without recording anything
    pub fn usage(&self) -> WindowUsage {
        let now = Instant::now();
        let mut timestamps = self.timestamps.lock();
        Self::prune(&mut timestamps, now, self.window);
        WindowUsage {
            current: timestamps.len(),
            limit: self.limit,
            window_secs: self.window.as_secs(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) >= window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}
