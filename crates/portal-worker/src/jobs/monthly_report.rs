//! Previous-month attendance summary sent to the reporting roles.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};

use portal_core::result::AppResult;
use portal_service::MonthlyReportService;

/// One run of the monthly report.
#[derive(Debug, Clone)]
pub struct MonthlyReportJob {
    reports: Arc<MonthlyReportService>,
    roles: Vec<String>,
}

impl MonthlyReportJob {
    /// Job sending to holders of `roles`.
    pub fn new(reports: Arc<MonthlyReportService>, roles: Vec<String>) -> Self {
        Self { reports, roles }
    }

    /// Build and dispatch the report for the month before now.
    pub async fn run(&self) -> AppResult<()> {
        let summary = self.reports.send(Utc::now(), &self.roles).await?;
        info!(
            dispatch_id = %summary.dispatch_id,
            status = %summary.status,
            recipient_count = summary.recipient_count,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Monthly report dispatched"
        );
        Ok(())
    }

    /// Run and log instead of propagating; used by the scheduler.
    pub async fn run_logged(&self) {
        if let Err(e) = self.run().await {
            error!(error = %e, "Monthly report dispatch failed");
        }
    }
}
