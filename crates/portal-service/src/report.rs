//! Monthly attendance summary dispatched to reporting roles.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::AttendanceRepository;
use portal_entity::attendance::AttendanceSummary;
use portal_notify::{
    Audience, DispatchRequest, DispatchSummary, MessageContent, NotificationDispatcher,
};

/// The calendar month a report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    /// First instant of the month.
    pub start: DateTime<Utc>,
    /// First instant of the following month.
    pub end: DateTime<Utc>,
    /// Display label, e.g. "February 2025".
    pub label: String,
}

impl ReportPeriod {
    /// The full calendar month before the one containing `now`.
    pub fn previous_month(now: DateTime<Utc>) -> AppResult<Self> {
        let (year, month) = if now.month() == 1 {
            (now.year() - 1, 12)
        } else {
            (now.year(), now.month() - 1)
        };
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::internal("Invalid report month"))?;
        let next = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
            .ok_or_else(|| AppError::internal("Invalid report month"))?;
        let midnight = |d: NaiveDate| {
            d.and_hms_opt(0, 0, 0)
                .map(|dt| Utc.from_utc_datetime(&dt))
                .ok_or_else(|| AppError::internal("Invalid report boundary"))
        };
        Ok(Self {
            start: midnight(first)?,
            end: midnight(next)?,
            label: first.format("%B %Y").to_string(),
        })
    }
}

/// Builds and sends the monthly attendance report.
#[derive(Debug, Clone)]
pub struct MonthlyReportService {
    attendance_repo: Arc<AttendanceRepository>,
    dispatcher: Arc<NotificationDispatcher>,
    template: String,
}

impl MonthlyReportService {
    /// Creates a new report service.
    pub fn new(
        attendance_repo: Arc<AttendanceRepository>,
        dispatcher: Arc<NotificationDispatcher>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            attendance_repo,
            dispatcher,
            template: template.into(),
        }
    }

    /// Summarize the previous month and send it to `roles`.
    pub async fn send(&self, now: DateTime<Utc>, roles: &[String]) -> AppResult<DispatchSummary> {
        let period = ReportPeriod::previous_month(now)?;
        let summary = self
            .attendance_repo
            .summarize(period.start, period.end)
            .await?;

        info!(
            month = %period.label,
            approved = summary.approved,
            pending = summary.pending,
            rejected = summary.rejected,
            "Monthly attendance summary built"
        );

        let request = DispatchRequest::new(
            "monthly_report",
            MessageContent::template(&self.template, report_variables(&period, &summary)),
            Audience::roles(roles.iter().cloned()),
        )
        .about(period.start.format("%Y-%m").to_string());
        self.dispatcher.dispatch_detached(request).await
    }
}

fn report_variables(
    period: &ReportPeriod,
    summary: &AttendanceSummary,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("month".to_string(), period.label.clone()),
        ("approved".to_string(), summary.approved.to_string()),
        ("pending".to_string(), summary.pending.to_string()),
        ("rejected".to_string(), summary.rejected.to_string()),
        ("total".to_string(), summary.total().to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_month_mid_year() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let period = ReportPeriod::previous_month(now).unwrap();
        assert_eq!(period.start, Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(period.end, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(period.label, "February 2025");
    }

    #[test]
    fn test_previous_month_wraps_year() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let period = ReportPeriod::previous_month(now).unwrap();
        assert_eq!(period.start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(period.label, "December 2025");
    }

    #[test]
    fn test_report_variables_include_total() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let period = ReportPeriod::previous_month(now).unwrap();
        let summary = AttendanceSummary {
            approved: 40,
            pending: 3,
            rejected: 2,
        };
        let vars = report_variables(&period, &summary);
        assert_eq!(vars["total"], "45");
        assert_eq!(vars["month"], "February 2025");
    }
}
