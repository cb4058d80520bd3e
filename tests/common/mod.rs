//! Common test utilities for review-monitor
//!
//! - Test fixtures and data factories
//! - A wiremock stand-in for the Places API
//! - Custom assertions and helpers

pub mod fixtures;
pub mod places;

// Re-export commonly used items
pub use fixtures::{CompanyFactory, ReviewJson};
pub use places::MockPlaces;

use parking_lot::Mutex;
use review_monitor::core::batch::BatchEngine;
use review_monitor::core::progress::{
    JobReport, ProgressSink, ProgressSnapshot, ProgressStore, SessionToken,
};
use std::sync::Arc;
use std::time::Duration;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}

/// Poll `token` until its job completes, keeping every distinct snapshot seen
pub async fn wait_for_completion(engine: &BatchEngine, token: &SessionToken) -> Vec<ProgressSnapshot> {
    let mut seen: Vec<ProgressSnapshot> = Vec::new();
    for _ in 0..500 {
        if let Some(snapshot) = engine.poll(token) {
            let done = snapshot.is_complete;
            if seen.last() != Some(&snapshot) {
                seen.push(snapshot);
            }
            if done {
                return seen;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {} did not complete; last snapshot: {:?}", token, seen.last());
}

/// Invariants every snapshot sequence of one job must satisfy
pub fn assert_consistent(snapshots: &[ProgressSnapshot]) {
    for pair in snapshots.windows(2) {
        assert!(
            pair[1].processed_items >= pair[0].processed_items,
            "processed went backwards: {:?}",
            pair
        );
    }
    for snapshot in snapshots {
        assert_eq!(
            snapshot.processed_items,
            snapshot.successful_items + snapshot.failed_items,
            "counts do not add up: {:?}",
            snapshot
        );
        assert!(snapshot.processed_items <= snapshot.total_items);
        assert!(snapshot.duplicate_items <= snapshot.failed_items);
    }
}

/// Sink that keeps every snapshot a runner publishes and forwards it to a store
pub struct RecordingSink {
    store: Arc<ProgressStore>,
    published: Mutex<Vec<ProgressSnapshot>>,
}

impl RecordingSink {
    pub fn new(store: Arc<ProgressStore>) -> Self {
        Self {
            store,
            published: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshots(&self) -> Vec<ProgressSnapshot> {
        self.published.lock().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn publish(&self, token: &SessionToken, snapshot: ProgressSnapshot) {
        self.published.lock().push(snapshot.clone());
        self.store.update_progress(token, snapshot);
    }

    fn attach_report(&self, token: &SessionToken, report: serde_json::Value) -> JobReport {
        self.store.store_report(token, report)
    }
}
