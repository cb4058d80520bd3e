//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::batch::BatchEngine;
use crate::core::progress::ProgressStore;
use crate::core::rate_limiter::{RemoteCaller, SlidingWindow};
use crate::services::{
    LogNotifier, MonitorScheduler, NotificationSender, PlacesClient, PlacesScraper,
    ReviewScraper,
};
use crate::storage::{MemoryStore, RecordStore};
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Every field is shared, so cloning the state per worker is cheap. The
/// remote caller is built once and handed to every Places consumer, which
/// keeps the request quota global to the process.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    pub engine: Arc<BatchEngine>,
    pub store: Arc<dyn RecordStore>,
    pub places: PlacesClient,
    pub notifier: Arc<dyn NotificationSender>,
    pub scraper: Arc<dyn ReviewScraper>,
    pub scheduler: Arc<MonitorScheduler>,
    /// Mail quota shared by every outreach campaign
    pub outreach_throttle: Arc<SlidingWindow>,
}

impl AppState {
    /// State backed by the in-memory record store and the logging notifier
    pub fn new(config: Config) -> Result<Self> {
        Self::with_collaborators(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(LogNotifier::new()),
        )
    }

    /// State over caller supplied records and mail delivery
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Result<Self> {
        let caller = Arc::new(RemoteCaller::new(config.rate_limit()));
        let outreach_throttle = Arc::new(SlidingWindow::per_minute(
            config.email().max_per_minute as usize,
        ));
        let places = PlacesClient::new(config.places(), caller)?;
        let progress = Arc::new(ProgressStore::new(config.progress()));
        let engine = Arc::new(BatchEngine::new(progress, config.batch().clone()));
        let scraper: Arc<dyn ReviewScraper> = Arc::new(PlacesScraper::new(places.clone()));
        let scheduler = Arc::new(MonitorScheduler::new(
            store.clone(),
            places.clone(),
            notifier.clone(),
            engine.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            engine,
            store,
            places,
            notifier,
            scraper,
            scheduler,
            outreach_throttle,
        })
    }

    pub fn progress(&self) -> &Arc<ProgressStore> {
        self.engine.store()
    }
}
