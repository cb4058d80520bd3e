//! Job submission endpoints
//!
//! Every endpoint validates its body, picks the items, submits the job and
//! answers with the session id to poll.

use crate::core::models::{Company, CustomerEmail, ImportRow, ReportPeriod};
use crate::server::routes::{ApiResponse, SubmitResponse};
use crate::server::state::AppState;
use crate::services::ScrapingOptions;
use crate::services::jobs::{
    ImportCompaniesJob, OutreachEmailJob, RefreshReviewsJob, ReviewReportJob, ScrapeReviewsJob,
};
use crate::utils::error::{MonitorError, Result};
use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Configure job submission routes
///
/// Plain resources rather than an `/api` scope, which would shadow the
/// progress and monitor scopes registered after it.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/companies/import").route(web::post().to(import_companies)))
        .service(web::resource("/api/reviews/refresh").route(web::post().to(refresh_reviews)))
        .service(web::resource("/api/reviews/report").route(web::post().to(review_report)))
        .service(web::resource("/api/reviews/scrape").route(web::post().to(scrape_reviews)))
        .service(web::resource("/api/outreach/send").route(web::post().to(send_outreach)));
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub rows: Vec<ImportRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub company_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
    pub company_ids: Option<Vec<String>>,
}

fn default_max_rating() -> u8 {
    3
}

impl ReportRequest {
    fn period(&self) -> Result<ReportPeriod> {
        if self.from_date > self.to_date {
            return Err(MonitorError::validation("fromDate must not be after toDate"));
        }
        if !(1..=5).contains(&self.max_rating) {
            return Err(MonitorError::validation("maxRating must be between 1 and 5"));
        }
        Ok(ReportPeriod {
            from_date: self.from_date,
            to_date: self.to_date,
            max_rating: self.max_rating,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub company_ids: Option<Vec<String>>,
    pub max_reviews: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutreachRequest {
    pub customers: Vec<CustomerEmail>,
    pub test_email: Option<String>,
}

/// Monitorable companies among `ids`, or among all companies when absent
async fn select_companies(state: &AppState, ids: Option<&[String]>) -> Result<Vec<Company>> {
    let companies = match ids {
        Some(ids) => state.store.companies_by_ids(ids).await?,
        None => state.store.list_companies().await?,
    };
    Ok(companies.into_iter().filter(Company::is_monitorable).collect())
}

fn submitted(session_id: String, total_items: usize) -> HttpResponse {
    ApiResponse::success(SubmitResponse {
        session_id,
        total_items,
    })
    .to_http_response()
}

async fn import_companies(
    state: web::Data<AppState>,
    request: web::Json<ImportRequest>,
) -> ActixResult<HttpResponse> {
    let rows = request.into_inner().rows;
    if rows.is_empty() {
        return Err(MonitorError::bad_request("rows must not be empty").into());
    }

    let total = rows.len();
    let job = Arc::new(ImportCompaniesJob::new(
        state.store.clone(),
        state.places.clone(),
    ));
    let token = state
        .engine
        .submit(job, rows, state.engine.sequential_mode());
    info!(session_id = %token, rows = total, "Company import requested");
    Ok(submitted(token.to_string(), total))
}

async fn refresh_reviews(
    state: web::Data<AppState>,
    request: web::Json<RefreshRequest>,
) -> ActixResult<HttpResponse> {
    let companies = select_companies(&state, request.company_ids.as_deref()).await?;

    let total = companies.len();
    let job = Arc::new(RefreshReviewsJob::new(
        state.store.clone(),
        state.places.clone(),
    ));
    let token = state
        .engine
        .submit(job, companies, state.engine.sequential_mode());
    info!(session_id = %token, companies = total, "Review refresh requested");
    Ok(submitted(token.to_string(), total))
}

async fn review_report(
    state: web::Data<AppState>,
    request: web::Json<ReportRequest>,
) -> ActixResult<HttpResponse> {
    let period = request.period()?;
    let companies = select_companies(&state, request.company_ids.as_deref()).await?;

    let total = companies.len();
    let job = Arc::new(ReviewReportJob::new(state.places.clone(), period));
    let token = state
        .engine
        .submit(job, companies, state.engine.sequential_mode());
    info!(session_id = %token, companies = total, "Bad review report requested");
    Ok(submitted(token.to_string(), total))
}

async fn scrape_reviews(
    state: web::Data<AppState>,
    request: web::Json<ScrapeRequest>,
) -> ActixResult<HttpResponse> {
    let mut options = ScrapingOptions::default();
    if let Some(max_reviews) = request.max_reviews {
        if max_reviews == 0 {
            return Err(MonitorError::validation("maxReviews must be at least 1").into());
        }
        options.max_reviews = max_reviews;
    }
    let companies = select_companies(&state, request.company_ids.as_deref()).await?;

    let total = companies.len();
    let job = Arc::new(ScrapeReviewsJob::new(
        state.store.clone(),
        state.scraper.clone(),
        options,
    ));
    let token = state
        .engine
        .submit(job, companies, state.engine.chunked_mode());
    info!(session_id = %token, companies = total, "Review scrape requested");
    Ok(submitted(token.to_string(), total))
}

async fn send_outreach(
    state: web::Data<AppState>,
    request: web::Json<OutreachRequest>,
) -> ActixResult<HttpResponse> {
    let OutreachRequest {
        customers,
        test_email,
    } = request.into_inner();
    if customers.is_empty() {
        return Err(MonitorError::bad_request("customers must not be empty").into());
    }

    let email = state.config.email();
    let test_email = test_email.or_else(|| email.test_email.clone());
    let total = customers.len();
    let job = Arc::new(OutreachEmailJob::new(
        state.notifier.clone(),
        state.outreach_throttle.clone(),
        test_email,
    ));
    let test_mode = job.is_test_mode();
    let token = state
        .engine
        .submit(job, customers, state.engine.sequential_mode());
    info!(session_id = %token, customers = total, test_mode, "Outreach requested");
    Ok(submitted(token.to_string(), total))
}
