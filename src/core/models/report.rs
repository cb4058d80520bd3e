//! Bad review reports

use super::company::Company;
use super::review::{Review, average_rating};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time window and rating threshold a report covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    /// Reviews rated at or below this are bad
    pub max_rating: u8,
}

impl ReportPeriod {
    pub fn is_bad(&self, review: &Review) -> bool {
        review.rating <= self.max_rating
            && review.time >= self.from_date
            && review.time <= self.to_date
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyReviewReport {
    pub company: Company,
    /// Lowest rating first, newest first within a rating
    pub bad_reviews: Vec<Review>,
    /// Mean rating of the bad reviews
    pub average_rating: f64,
    pub total_bad_reviews: usize,
}

impl CompanyReviewReport {
    /// `None` when the company has no bad review in the period
    pub fn collect(company: Company, reviews: &[Review], period: &ReportPeriod) -> Option<Self> {
        let mut bad_reviews: Vec<Review> = reviews
            .iter()
            .filter(|r| period.is_bad(r))
            .cloned()
            .collect();
        if bad_reviews.is_empty() {
            return None;
        }
        bad_reviews.sort_by(|a, b| a.rating.cmp(&b.rating).then_with(|| b.time.cmp(&a.time)));

        Some(Self {
            company,
            average_rating: average_rating(&bad_reviews),
            total_bad_reviews: bad_reviews.len(),
            bad_reviews,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMonitorReport {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    pub max_rating: u8,
    /// Worst average first
    pub company_reports: Vec<CompanyReviewReport>,
    pub generated_at: DateTime<Utc>,
    pub total_companies_checked: usize,
    pub companies_with_issues: usize,
    pub total_bad_reviews: usize,
}

impl ReviewMonitorReport {
    pub fn build(
        period: &ReportPeriod,
        companies_checked: usize,
        mut company_reports: Vec<CompanyReviewReport>,
    ) -> Self {
        company_reports.sort_by(|a, b| a.average_rating.total_cmp(&b.average_rating));

        Self {
            from_date: period.from_date,
            to_date: period.to_date,
            max_rating: period.max_rating,
            generated_at: Utc::now(),
            total_companies_checked: companies_checked,
            companies_with_issues: company_reports.len(),
            total_bad_reviews: company_reports.iter().map(|r| r.total_bad_reviews).sum(),
            company_reports,
        }
    }
}
