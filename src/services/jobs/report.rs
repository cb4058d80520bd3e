//! Bad review report

use crate::core::batch::{BatchJob, ItemOutcome, JobSummary};
use crate::core::models::{
    Company, CompanyReviewReport, ReportPeriod, ReviewFilter, ReviewMonitorReport,
};
use crate::core::progress::SessionToken;
use crate::services::places::PlacesClient;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Collects bad reviews per company; the payload is a [`ReviewMonitorReport`]
pub struct ReviewReportJob {
    places: PlacesClient,
    period: ReportPeriod,
}

impl ReviewReportJob {
    pub fn new(places: PlacesClient, period: ReportPeriod) -> Self {
        Self { places, period }
    }

    pub fn period(&self) -> &ReportPeriod {
        &self.period
    }
}

#[async_trait]
impl BatchJob for ReviewReportJob {
    type Item = Company;
    type Output = CompanyReviewReport;

    fn name(&self) -> &'static str {
        "review_report"
    }

    async fn process(&self, company: Company) -> Result<ItemOutcome<CompanyReviewReport>> {
        let filter = ReviewFilter {
            from_date: Some(self.period.from_date),
            to_date: Some(self.period.to_date),
            min_rating: None,
            max_rating: Some(self.period.max_rating),
        };
        let data = self.places.get_filtered_reviews(&company, &filter).await?;
        let name = company.name.clone();

        Ok(
            match CompanyReviewReport::collect(company, &data.reviews, &self.period) {
                Some(report) => ItemOutcome::with_output(
                    format!("⚠ {}: {} bad reviews", name, report.total_bad_reviews),
                    report,
                ),
                None => ItemOutcome::succeeded(format!("✓ {}: no bad reviews", name)),
            },
        )
    }

    async fn finish(
        &self,
        outputs: Vec<CompanyReviewReport>,
        summary: &JobSummary,
    ) -> Result<Option<serde_json::Value>> {
        let report = ReviewMonitorReport::build(&self.period, summary.total, outputs);
        Ok(Some(serde_json::to_value(report)?))
    }

    fn context(&self) -> String {
        self.places.caller().describe()
    }

    fn redirect_url(&self, token: &SessionToken) -> Option<String> {
        Some(format!("/reviews/report/{}", token))
    }
}
