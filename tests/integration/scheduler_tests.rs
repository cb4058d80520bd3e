//! Scheduled monitors wired through the application state

use crate::common::fixtures::place_details;
use crate::common::{CompanyFactory, MockPlaces, ReviewJson};
use chrono::{Duration as TimeDelta, Utc};
use review_monitor::Config;
use review_monitor::core::models::{ExecutionStatus, ScheduledMonitor};
use review_monitor::server::AppState;
use review_monitor::services::LogNotifier;
use review_monitor::storage::{MemoryStore, RecordStore};
use std::sync::Arc;
use std::time::Duration;

async fn wired_state(places: &MockPlaces) -> (AppState, Arc<LogNotifier>) {
    places
        .details(
            "p-good",
            place_details(4.8, &[ReviewJson::new("g1", 5), ReviewJson::new("g2", 4)]),
        )
        .await;
    places
        .details(
            "p-bad",
            place_details(
                2.1,
                &[
                    ReviewJson::new("b1", 1),
                    ReviewJson::new("b2", 3).days_ago(2),
                    ReviewJson::new("b3", 2).days_ago(20),
                ],
            ),
        )
        .await;

    let store = MemoryStore::with_companies([
        CompanyFactory::with_place("c-good", "Good Bakery", "p-good"),
        CompanyFactory::with_place("c-bad", "Bad Diner", "p-bad"),
        CompanyFactory::without_place("c-none", "Unlisted Shop"),
    ]);

    let mut config = Config::default();
    config.app.places = places.config();
    config.app.rate_limit = MockPlaces::rate_limits();
    let notifier = Arc::new(LogNotifier::new());
    let state = AppState::with_collaborators(config, Arc::new(store), notifier.clone()).unwrap();
    (state, notifier)
}

async fn save_due_monitor(state: &AppState, name: &str) -> ScheduledMonitor {
    let mut monitor = ScheduledMonitor::daily(name, "ops@example.com");
    monitor.next_run_at = Some(Utc::now() - TimeDelta::minutes(1));
    state.store.save_monitor(monitor.clone()).await.unwrap();
    monitor
}

#[tokio::test]
async fn test_due_monitor_mails_report_and_reschedules() {
    let places = MockPlaces::start().await;
    let (state, notifier) = wired_state(&places).await;
    let monitor = save_due_monitor(&state, "Daily digest").await;

    let now = Utc::now();
    let ran = state.scheduler.process_due(now).await.unwrap();
    assert_eq!(ran, 1);

    let executions = state.store.executions(&monitor.id, 10).await.unwrap();
    assert_eq!(executions.len(), 1);
    let execution = &executions[0];
    assert_eq!(execution.status, ExecutionStatus::Success);
    assert!(execution.email_sent);
    assert_eq!(execution.companies_checked, 2);
    assert_eq!(execution.companies_with_issues, 1);
    assert_eq!(execution.total_bad_reviews, 2);

    let deliveries = notifier.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].to, "ops@example.com");
    assert!(deliveries[0].subject.starts_with("Daily digest"));

    let stored = state.store.get_monitor(&monitor.id).await.unwrap().unwrap();
    assert_eq!(stored.last_run_at, Some(now));
    assert!(stored.next_run_at.unwrap() > now);

    // nothing due any more, and the report session was not left behind
    assert_eq!(state.scheduler.process_due(now).await.unwrap(), 0);
    assert_eq!(state.progress().session_count(), 0);
}

#[tokio::test]
async fn test_background_loop_picks_up_due_monitors() {
    let places = MockPlaces::start().await;
    let (state, notifier) = wired_state(&places).await;
    let monitor = save_due_monitor(&state, "Loop digest").await;

    let handle = state.scheduler.start(Duration::from_millis(20));
    for _ in 0..200 {
        if !notifier.deliveries().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    handle.abort();

    assert_eq!(notifier.deliveries().len(), 1);
    let executions = state.store.executions(&monitor.id, 10).await.unwrap();
    assert_eq!(executions.len(), 1);
}
