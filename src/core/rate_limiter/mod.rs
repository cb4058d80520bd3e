//! Rate-limited remote calls
//!
//! Provides a sliding window admission gate and the caller that combines it
//! with a concurrency cap and exponential backoff on throttling answers.

mod caller;
mod types;
mod window;


// Re-export public types
pub use caller::RemoteCaller;
pub use types::{RateLimitSignal, WindowUsage};
pub use window::SlidingWindow;
