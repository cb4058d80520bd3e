//! Scheduled review monitors

use super::report::ReportPeriod;
use crate::utils::error::{MonitorError, Result};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleType {
    Daily,
    Weekly,
    Monthly,
}

/// A recurring bad review report mailed to one address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMonitor {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub email_address: String,
    pub schedule_type: ScheduleType,
    /// Time of day, UTC
    pub schedule_time: NaiveTime,
    /// Required for weekly schedules
    pub day_of_week: Option<Weekday>,
    /// Required for monthly schedules; clamped to the length of the month
    pub day_of_month: Option<u32>,
    pub max_rating: u8,
    pub review_period_days: u32,
    pub is_active: bool,
    pub include_all_companies: bool,
    /// Checked companies when `include_all_companies` is off
    pub company_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub next_run_at: Option<DateTime<Utc>>,
}

impl ScheduledMonitor {
    /// Daily monitor at 09:00 reporting reviews rated 3 or less over the last week
    pub fn daily(name: impl Into<String>, email_address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            email_address: email_address.into(),
            schedule_type: ScheduleType::Daily,
            schedule_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
            day_of_week: None,
            day_of_month: None,
            max_rating: 3,
            review_period_days: 7,
            is_active: true,
            include_all_companies: true,
            company_ids: Vec::new(),
            created_at: Utc::now(),
            last_run_at: None,
            next_run_at: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(MonitorError::validation("monitor name is required"));
        }
        if !self.email_address.contains('@') {
            return Err(MonitorError::validation(format!(
                "invalid email address: {}",
                self.email_address
            )));
        }
        if !(1..=5).contains(&self.max_rating) {
            return Err(MonitorError::validation("max_rating must be between 1 and 5"));
        }
        if !(1..=365).contains(&self.review_period_days) {
            return Err(MonitorError::validation(
                "review_period_days must be between 1 and 365",
            ));
        }
        match self.schedule_type {
            ScheduleType::Daily => Ok(()),
            ScheduleType::Weekly => self.day_of_week.map(|_| ()).ok_or_else(|| {
                MonitorError::validation("weekly schedules need a day of week")
            }),
            ScheduleType::Monthly => match self.day_of_month {
                Some(day) if (1..=31).contains(&day) => Ok(()),
                Some(day) => Err(MonitorError::validation(format!(
                    "day of month must be between 1 and 31, got {}",
                    day
                ))),
                None => Err(MonitorError::validation(
                    "monthly schedules need a day of month",
                )),
            },
        }
    }

    /// First scheduled instant strictly after `now`
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        self.validate()?;
        let today = now.date_naive();
        let at = |date: NaiveDate| date.and_time(self.schedule_time).and_utc();

        match self.schedule_type {
            ScheduleType::Daily => {
                let candidate = at(today);
                if candidate > now {
                    Ok(candidate)
                } else {
                    shift(today, 1).map(at)
                }
            }
            ScheduleType::Weekly => {
                let target = self
                    .day_of_week
                    .ok_or_else(|| MonitorError::validation("weekly schedules need a day of week"))?;
                let mut days = (7 + target.num_days_from_monday()
                    - today.weekday().num_days_from_monday())
                    % 7;
                if days == 0 && at(today) <= now {
                    days = 7;
                }
                shift(today, u64::from(days)).map(at)
            }
            ScheduleType::Monthly => {
                let day = self
                    .day_of_month
                    .ok_or_else(|| MonitorError::validation("monthly schedules need a day of month"))?;
                let candidate = at(clamped_date(today.year(), today.month(), day)?);
                if candidate > now {
                    return Ok(candidate);
                }
                let (year, month) = following_month(today.year(), today.month());
                Ok(at(clamped_date(year, month, day)?))
            }
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.next_run_at.is_some_and(|next| next <= now)
    }

    /// Report window ending at `now`
    pub fn period_ending(&self, now: DateTime<Utc>) -> ReportPeriod {
        ReportPeriod {
            from_date: now - TimeDelta::days(i64::from(self.review_period_days)),
            to_date: now,
            max_rating: self.max_rating,
        }
    }
}

fn shift(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| MonitorError::internal("schedule date out of range"))
}

fn following_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn clamped_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = following_month(year, month);
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .ok_or_else(|| MonitorError::internal("schedule date out of range"))?;

    NaiveDate::from_ymd_opt(year, month, day.min(last_day))
        .ok_or_else(|| MonitorError::internal("schedule date out of range"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Success,
    Failed,
    /// Report built but the email could not be delivered
    PartialSuccess,
}

/// Record of one monitor run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorExecution {
    pub id: String,
    pub monitor_id: String,
    pub executed_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub companies_checked: usize,
    pub companies_with_issues: usize,
    pub total_bad_reviews: usize,
    pub email_sent: bool,
    pub email_error: Option<String>,
    pub status: ExecutionStatus,
}

impl MonitorExecution {
    pub fn started(monitor_id: impl Into<String>, period: &ReportPeriod) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            monitor_id: monitor_id.into(),
            executed_at: Utc::now(),
            period_start: period.from_date,
            period_end: period.to_date,
            companies_checked: 0,
            companies_with_issues: 0,
            total_bad_reviews: 0,
            email_sent: false,
            email_error: None,
            status: ExecutionStatus::Success,
        }
    }
}
