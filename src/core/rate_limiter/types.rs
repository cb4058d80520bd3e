//! Rate limiter types

/// Lets the caller recognise a structured "too many requests" answer
pub trait RateLimitSignal {
    fn is_rate_limited(&self) -> bool;
}

impl RateLimitSignal for reqwest::Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
    }
}

/// Point-in-time view of a sliding window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUsage {
    /// Requests recorded inside the trailing window
    pub current: usize,
    /// Maximum admitted inside the window
    pub limit: usize,
    /// Window length in seconds
    pub window_secs: u64,
}

impl WindowUsage {
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.current)
    }
}
