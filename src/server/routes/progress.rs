//! Progress polling endpoints

use crate::core::progress::SessionToken;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::MonitorError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use tracing::debug;

/// Configure progress routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/batch-progress")
            .route("/{session_id}", web::get().to(get_progress))
            .route("/{session_id}", web::delete().to(clear_progress))
            .route("/{session_id}/report", web::get().to(take_report)),
    );
}

/// Latest snapshot of a session; unknown and expired sessions are 404
async fn get_progress(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let token = SessionToken::from(path.into_inner());
    let snapshot = state
        .engine
        .poll(&token)
        .ok_or_else(|| MonitorError::not_found(format!("no progress for session {}", token)))?;
    Ok(ApiResponse::success(snapshot).to_http_response())
}

/// Report of a finished session; the first read consumes it
async fn take_report(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let token = SessionToken::from(path.into_inner());
    let report = state
        .engine
        .take_report(&token)
        .ok_or_else(|| MonitorError::not_found(format!("no report for session {}", token)))?;
    debug!(session_id = %token, "Report handed out");
    Ok(ApiResponse::success(&*report).to_http_response())
}

async fn clear_progress(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let token = SessionToken::from(path.into_inner());
    state.engine.clear(&token);
    Ok(ApiResponse::success(serde_json::json!({ "cleared": token.as_str() })).to_http_response())
}
