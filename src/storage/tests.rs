//! Tests for the in-process record store

use super::*;
use crate::core::models::ExecutionStatus;
use crate::utils::error::MonitorError;
use chrono::{TimeDelta, TimeZone, Utc};

fn company(name: &str, place_id: &str) -> Company {
    Company::new(name).with_place_id(place_id)
}

#[tokio::test]
async fn test_insert_rejects_duplicate_place_id() {
    let store = MemoryStore::new();
    store.insert_company(company("Acme", "ChIJ1")).await.unwrap();

    let err = store
        .insert_company(company("Acme again", " ChIJ1 "))
        .await
        .unwrap_err();
    assert!(matches!(err, MonitorError::Conflict(_)));

    store.insert_company(Company::new("No place")).await.unwrap();
    store.insert_company(Company::new("No place either")).await.unwrap();
    assert_eq!(store.list_companies().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_companies_are_listed_by_name() {
    let store = MemoryStore::with_companies([company("Beta", "p2"), company("Alpha", "p1")]);
    let names: Vec<String> = store
        .list_companies()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);

    let mut ids = store.place_ids().await.unwrap();
    ids.sort();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn test_update_unknown_company_is_not_found() {
    let store = MemoryStore::new();
    let err = store.update_company(Company::new("Ghost")).await.unwrap_err();
    assert!(matches!(err, MonitorError::NotFound(_)));
}

#[tokio::test]
async fn test_companies_by_ids_skips_unknown() {
    let acme = company("Acme", "p1");
    let store = MemoryStore::with_companies([acme.clone()]);

    let found = store
        .companies_by_ids(&[acme.id.clone(), "missing".to_string()])
        .await
        .unwrap();
    assert_eq!(found, vec![acme]);
}

#[tokio::test]
async fn test_due_monitors_and_history() {
    let store = MemoryStore::new();
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

    let mut due = ScheduledMonitor::daily("due", "a@example.com");
    due.next_run_at = Some(now - TimeDelta::minutes(1));
    let mut later = ScheduledMonitor::daily("later", "b@example.com");
    later.next_run_at = Some(now + TimeDelta::hours(1));
    store.save_monitor(due.clone()).await.unwrap();
    store.save_monitor(later).await.unwrap();

    let found = store.due_monitors(now).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, due.id);

    let period = due.period_ending(now);
    for offset in 0..3 {
        let mut execution = MonitorExecution::started(&due.id, &period);
        execution.executed_at = now + TimeDelta::minutes(offset);
        execution.status = ExecutionStatus::Success;
        store.record_execution(execution).await.unwrap();
    }

    let history = store.executions(&due.id, 2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history[0].executed_at > history[1].executed_at);

    assert!(store.delete_monitor(&due.id).await.unwrap());
    assert!(!store.delete_monitor(&due.id).await.unwrap());
}
