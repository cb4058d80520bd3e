//! Company listing and live review lookups

use crate::core::models::{Company, ReviewFilter};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::utils::error::{MonitorError, Result};
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;

/// Configure company routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/companies").route(web::get().to(list_companies)))
        .service(
            web::resource("/api/companies/{company_id}/reviews")
                .route(web::get().to(filtered_reviews)),
        );
}

/// Entry of the company listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: String,
    pub name: String,
    pub place_id: Option<String>,
    pub overall_rating: Option<f64>,
}

impl From<Company> for CompanySummary {
    fn from(company: Company) -> Self {
        Self {
            place_id: company.place_id().map(str::to_string),
            id: company.id,
            name: company.name,
            overall_rating: company.overall_rating,
        }
    }
}

fn check_filter(filter: &ReviewFilter) -> Result<()> {
    for rating in [filter.min_rating, filter.max_rating].into_iter().flatten() {
        if !(1..=5).contains(&rating) {
            return Err(MonitorError::validation("ratings must be between 1 and 5"));
        }
    }
    if let (Some(min), Some(max)) = (filter.min_rating, filter.max_rating) {
        if min > max {
            return Err(MonitorError::validation("minRating must not exceed maxRating"));
        }
    }
    if let (Some(from), Some(to)) = (filter.from_date, filter.to_date) {
        if from > to {
            return Err(MonitorError::validation("fromDate must not be after toDate"));
        }
    }
    Ok(())
}

/// Active companies ordered by name
async fn list_companies(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let mut companies: Vec<Company> = state
        .store
        .list_companies()
        .await?
        .into_iter()
        .filter(|c| c.is_active)
        .collect();
    companies.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let summaries: Vec<CompanySummary> = companies.into_iter().map(Into::into).collect();
    Ok(ApiResponse::success(summaries).to_http_response())
}

/// Current Google reviews of one company narrowed by date and rating
async fn filtered_reviews(
    state: web::Data<AppState>,
    path: web::Path<String>,
    filter: web::Query<ReviewFilter>,
) -> ActixResult<HttpResponse> {
    let filter = filter.into_inner();
    check_filter(&filter)?;

    let id = path.into_inner();
    let company = state
        .store
        .get_company(&id)
        .await?
        .ok_or_else(|| MonitorError::not_found(format!("company {} not found", id)))?;

    let reviews = state.places.get_filtered_reviews(&company, &filter).await?;
    Ok(ApiResponse::success(reviews).to_http_response())
}
