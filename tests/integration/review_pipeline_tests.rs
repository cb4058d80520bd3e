//! Import, refresh, scrape and report jobs through the engine

use crate::common::fixtures::place_details;
use crate::common::{
    CompanyFactory, MockPlaces, RecordingSink, ReviewJson, assert_consistent, wait_for_completion,
};
use chrono::{Duration, Utc};
use review_monitor::config::{BatchConfig, ProgressConfig};
use review_monitor::core::batch::{BatchEngine, BatchRunner, ExecutionMode};
use review_monitor::core::models::ReportPeriod;
use review_monitor::core::progress::{JobStatus, ProgressStore};
use review_monitor::core::rate_limiter::SlidingWindow;
use review_monitor::services::jobs::{
    ImportCompaniesJob, OutreachEmailJob, RefreshReviewsJob, ReviewReportJob, ScrapeReviewsJob,
};
use review_monitor::services::scraper::SortOrder;
use review_monitor::services::{LogNotifier, PlacesScraper, ScrapingOptions};
use review_monitor::storage::{MemoryStore, RecordStore};
use serde_json::json;
use std::sync::Arc;

fn engine(chunk_size: usize) -> BatchEngine {
    let progress = Arc::new(ProgressStore::new(&ProgressConfig::default()));
    BatchEngine::new(
        progress,
        BatchConfig {
            chunk_size,
            inter_chunk_delay_ms: 0,
            recent_results_limit: 10,
        },
    )
}

async fn mount_places(places: &MockPlaces) {
    places.search_hit("p-alpha", "Alpha GmbH").await;
    places
        .details(
            "p-alpha",
            place_details(
                3.2,
                &[
                    ReviewJson::new("a1", 1).author("Kim"),
                    ReviewJson::new("a2", 5),
                    ReviewJson::new("a3", 2).days_ago(3),
                    ReviewJson::new("a4", 1).days_ago(30),
                ],
            ),
        )
        .await;
    places.details_status("p-beta", 404).await;
}

#[tokio::test]
async fn test_import_refresh_and_report() {
    let places = MockPlaces::start().await;
    mount_places(&places).await;
    let client = places.client();
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let engine = engine(2);

    // import: one row is looked up by name, one repeats the found place
    let mut alpha = CompanyFactory::import_row("Alpha", None);
    alpha.location = Some("Berlin".to_string());
    let rows = vec![
        alpha,
        CompanyFactory::import_row("Beta", Some("p-beta")),
        CompanyFactory::import_row("Alpha again", Some("p-alpha")),
    ];
    let job = Arc::new(ImportCompaniesJob::new(store.clone(), client.clone()));
    let token = engine.submit(job, rows, engine.sequential_mode());

    let snapshots = wait_for_completion(&engine, &token).await;
    assert_consistent(&snapshots);
    let last = snapshots.last().unwrap();
    assert_eq!(last.status, JobStatus::Complete);
    assert_eq!(last.successful_items, 2);
    assert_eq!(last.duplicate_items, 1);
    assert_eq!(last.failed_items, 1);

    let report = engine.take_report(&token).unwrap();
    assert_eq!(report["imported"], json!(2));
    assert_eq!(report["duplicates"], json!(1));
    assert_eq!(report["failed"], json!(0));
    assert_eq!(places.requests_to("/v1/places:searchText").await, 1);

    let companies = store.list_companies().await.unwrap();
    assert_eq!(companies.len(), 2);
    assert_eq!(companies[0].name, "Alpha");
    assert_eq!(companies[0].place_id(), Some("p-alpha"));
    assert_eq!(
        companies[0].google_maps_url.as_deref(),
        Some("https://maps.example/p-alpha")
    );

    // refresh: beta's place is gone, alpha gets its reviews and rating
    let job = Arc::new(RefreshReviewsJob::new(store.clone(), client.clone()));
    let token = engine.submit(job, companies.clone(), engine.chunked_mode());

    let snapshots = wait_for_completion(&engine, &token).await;
    assert_consistent(&snapshots);
    let last = snapshots.last().unwrap();
    assert_eq!(last.status, JobStatus::Complete);
    assert_eq!(last.successful_items, 1);
    assert_eq!(last.failed_items, 1);
    assert!(last.recent_results.iter().any(|r| r.starts_with("✗ Beta")));
    assert!(engine.take_report(&token).is_none());

    let alpha = store.get_company(&companies[0].id).await.unwrap().unwrap();
    assert_eq!(alpha.overall_rating, Some(3.2));
    assert_eq!(store.reviews_for(&alpha.id).await.unwrap().len(), 4);

    // report: two bad reviews of alpha fall inside the last week
    let now = Utc::now();
    let period = ReportPeriod {
        from_date: now - Duration::days(7),
        to_date: now,
        max_rating: 3,
    };
    let job = Arc::new(ReviewReportJob::new(client, period));
    let token = engine.submit(job, companies, engine.sequential_mode());

    let snapshots = wait_for_completion(&engine, &token).await;
    assert_consistent(&snapshots);
    assert!(
        snapshots
            .iter()
            .all(|s| s.redirect_url.as_deref() == Some(&*format!("/reviews/report/{}", token)))
    );

    let report = engine.take_report(&token).unwrap();
    assert_eq!(report["totalCompaniesChecked"], json!(2));
    assert_eq!(report["companiesWithIssues"], json!(1));
    assert_eq!(report["totalBadReviews"], json!(2));
    let bad = &report["companyReports"][0]["badReviews"];
    assert_eq!(bad[0]["rating"], json!(1));
    assert_eq!(bad[0]["authorName"], json!("Kim"));
    assert_eq!(bad[1]["rating"], json!(2));
    assert!(engine.take_report(&token).is_none());
}

#[tokio::test]
async fn test_chunked_scrape_releases_every_session() {
    let places = MockPlaces::start().await;
    let mut companies = Vec::new();
    for i in 0..5 {
        let place_id = format!("p-{}", i);
        places
            .details(
                &place_id,
                place_details(
                    4.0,
                    &[
                        ReviewJson::new("old", 2).days_ago(10),
                        ReviewJson::new("new", 4).days_ago(1),
                    ],
                ),
            )
            .await;
        companies.push(CompanyFactory::with_place(
            &format!("c{}", i),
            &format!("Company {}", i),
            &place_id,
        ));
    }
    places.details_status("p-broken", 500).await;
    companies.push(CompanyFactory::with_place("c-broken", "Broken", "p-broken"));

    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::with_companies(companies.clone()));
    let scraper = Arc::new(PlacesScraper::new(places.client()));
    let options = ScrapingOptions {
        max_reviews: 1,
        sort_by: SortOrder::Newest,
        ..ScrapingOptions::default()
    };
    let engine = engine(2);

    let job = Arc::new(ScrapeReviewsJob::new(store.clone(), scraper.clone(), options));
    let token = engine.submit(job, companies, engine.chunked_mode());

    let snapshots = wait_for_completion(&engine, &token).await;
    assert_consistent(&snapshots);
    let last = snapshots.last().unwrap();
    assert_eq!(last.status, JobStatus::Complete);
    assert_eq!(last.processed_items, 6);
    assert_eq!(last.successful_items, 5);
    assert_eq!(last.failed_items, 1);
    assert_eq!(scraper.open_sessions(), 0);

    // the server error was retried before the item failed
    assert_eq!(places.requests_to("/v1/places/p-broken").await, 3);

    let kept = store.reviews_for("c0").await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].rating, 4);
}

#[tokio::test]
async fn test_refresh_without_api_key_fails_each_item() {
    let places = MockPlaces::start().await;
    let mut config = places.config();
    config.api_key = None;
    let caller = Arc::new(review_monitor::RemoteCaller::new(&MockPlaces::rate_limits()));
    let client = review_monitor::services::PlacesClient::new(&config, caller).unwrap();

    let companies = vec![
        CompanyFactory::with_place("c1", "One", "p-1"),
        CompanyFactory::with_place("c2", "Two", "p-2"),
    ];
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::with_companies(companies.clone()));
    let engine = engine(10);

    let job = Arc::new(RefreshReviewsJob::new(store, client));
    let token = engine.submit(job, companies, engine.sequential_mode());

    let last = wait_for_completion(&engine, &token).await.pop().unwrap();
    assert_eq!(last.status, JobStatus::Complete);
    assert_eq!(last.failed_items, 2);
    assert!(last.recent_results.iter().all(|r| r.contains("API key")));
    assert_eq!(places.requests_to("/v1/places/p-1").await, 0);
}

#[tokio::test]
async fn test_outreach_reports_sent_and_failed_addresses() {
    let notifier = Arc::new(LogNotifier::new());
    let progress = Arc::new(ProgressStore::new(&ProgressConfig::default()));
    let sink = Arc::new(RecordingSink::new(progress.clone()));
    let customers = vec![
        CompanyFactory::customer("Alpha", "owner@alpha.example"),
        CompanyFactory::customer("Beta", "not-an-address"),
        CompanyFactory::customer("Gamma", "owner@gamma.example"),
    ];

    let job = Arc::new(OutreachEmailJob::new(
        notifier.clone(),
        Arc::new(SlidingWindow::per_minute(60)),
        None,
    ));
    let token = progress.create_session();
    let summary = BatchRunner::new(sink.clone(), 10)
        .run(job, customers, ExecutionMode::Sequential, token.clone())
        .await;
    assert_eq!(summary.status, JobStatus::Complete);

    let snapshots = sink.snapshots();
    assert_consistent(&snapshots);
    let sending: Vec<_> = snapshots
        .iter()
        .filter(|s| s.status == JobStatus::Sending)
        .collect();
    assert_eq!(sending.len(), 3);
    assert_eq!(snapshots.last().unwrap().status, JobStatus::Complete);

    let report = progress.take_report(&token).unwrap();
    assert_eq!(report["totalEmails"], json!(3));
    assert_eq!(report["successCount"], json!(2));
    assert_eq!(report["failedEmails"], json!(["not-an-address"]));
    assert_eq!(report["isTestMode"], json!(false));
    assert_eq!(notifier.deliveries().len(), 2);
}
