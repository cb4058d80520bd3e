//! Scheduled monitor endpoints

use crate::core::models::{ScheduleType, ScheduledMonitor};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::MonitorError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use chrono::{NaiveTime, Utc, Weekday};
use serde::Deserialize;

/// Configure monitor routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/monitors")
            .route("", web::get().to(list_monitors))
            .route("", web::post().to(create_monitor))
            .route("/{monitor_id}", web::put().to(update_monitor))
            .route("/{monitor_id}", web::delete().to(delete_monitor))
            .route("/{monitor_id}/toggle", web::post().to(toggle_monitor))
            .route("/{monitor_id}/run", web::post().to(run_monitor))
            .route("/{monitor_id}/executions", web::get().to(list_executions)),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRequest {
    pub name: String,
    pub description: Option<String>,
    pub email_address: String,
    pub schedule_type: ScheduleType,
    pub schedule_time: Option<NaiveTime>,
    pub day_of_week: Option<Weekday>,
    pub day_of_month: Option<u32>,
    pub max_rating: Option<u8>,
    pub review_period_days: Option<u32>,
    pub company_ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl MonitorRequest {
    fn into_monitor(self) -> ScheduledMonitor {
        let mut monitor = ScheduledMonitor::daily(self.name.trim(), self.email_address.trim());
        monitor.description = self.description;
        monitor.schedule_type = self.schedule_type;
        if let Some(time) = self.schedule_time {
            monitor.schedule_time = time;
        }
        monitor.day_of_week = self.day_of_week;
        monitor.day_of_month = self.day_of_month;
        if let Some(max_rating) = self.max_rating {
            monitor.max_rating = max_rating;
        }
        if let Some(days) = self.review_period_days {
            monitor.review_period_days = days;
        }
        if let Some(ids) = self.company_ids {
            monitor.include_all_companies = false;
            monitor.company_ids = ids;
        }
        if let Some(active) = self.is_active {
            monitor.is_active = active;
        }
        monitor
    }
}

#[derive(Debug, Deserialize)]
pub struct ExecutionsQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

async fn list_monitors(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let monitors = state.store.list_monitors().await?;
    Ok(ApiResponse::success(monitors).to_http_response())
}

async fn create_monitor(
    state: web::Data<AppState>,
    request: web::Json<MonitorRequest>,
) -> ActixResult<HttpResponse> {
    let monitor = request.into_inner().into_monitor();
    let monitor = state.scheduler.create_monitor(monitor, Utc::now()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(monitor)))
}

async fn update_monitor(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<MonitorRequest>,
) -> ActixResult<HttpResponse> {
    let update = request.into_inner().into_monitor();
    let monitor = state
        .scheduler
        .update_monitor(&path, update, Utc::now())
        .await?;
    Ok(ApiResponse::success(monitor).to_http_response())
}

async fn toggle_monitor(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let monitor = state.scheduler.toggle_active(&path, Utc::now()).await?;
    Ok(ApiResponse::success(monitor).to_http_response())
}

async fn delete_monitor(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let id = path.into_inner();
    if !state.store.delete_monitor(&id).await? {
        return Err(MonitorError::not_found(format!("monitor {} not found", id)).into());
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Run a monitor now; answers once its report has been built and mailed
async fn run_monitor(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let execution = state.scheduler.run_now(&path, Utc::now()).await?;
    Ok(ApiResponse::success(execution).to_http_response())
}

async fn list_executions(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ExecutionsQuery>,
) -> ActixResult<HttpResponse> {
    let executions = state.store.executions(&path, query.limit.min(100)).await?;
    Ok(ApiResponse::success(executions).to_http_response())
}
