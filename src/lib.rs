//! # review-monitor
//!
//! Monitors Google review ratings across many companies. Long running work
//! (importing companies, refreshing and scraping reviews, bad review reports,
//! customer outreach) runs as background batch jobs whose progress callers
//! poll by session id.
//!
//! ## Features
//!
//! - **Batch engine**: one generic runner, sequential or in parallel chunks,
//!   with per-item failure isolation and pollable progress
//! - **Shared quota**: every Places API call goes through one rate-limited,
//!   retrying caller
//! - **Scheduled monitors**: daily, weekly or monthly bad review reports by mail
//!
//! ## Embedding the engine
//!
//! ```rust,no_run
//! use review_monitor::{Config, Monitor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/monitor.yaml").await?;
//!     let monitor = Monitor::new(config)?;
//!     monitor.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{MonitorError, Result};

pub use core::batch::{BatchEngine, BatchJob, ExecutionMode, ItemOutcome, JobSummary, WorkItem};
pub use core::progress::{JobStatus, ProgressSnapshot, ProgressStore, SessionToken};
pub use core::rate_limiter::RemoteCaller;

use tracing::info;

/// The monitor service: HTTP surface, progress cleanup and scheduler
pub struct Monitor {
    server: server::HttpServer,
}

impl Monitor {
    /// Create a new monitor instance
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating review monitor");
        let server = server::HttpServer::new(&config)?;
        Ok(Self { server })
    }

    /// Run until the HTTP server stops
    pub async fn run(self) -> Result<()> {
        let state = self.server.state().clone();
        info!("Configuration: {:#?}", state.config);

        let _cleanup = state.progress().start_cleanup_task();
        let _scheduler = if state.config.scheduler().enabled {
            Some(state.scheduler.start(state.config.scheduler().check_interval()))
        } else {
            info!("Monitor scheduler disabled");
            None
        };

        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
