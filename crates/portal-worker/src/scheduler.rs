//! Cron scheduler for periodic dispatches.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use portal_core::config::WorkerConfig;
use portal_core::error::AppError;

use crate::jobs::MonthlyReportJob;

/// Validate a six-field cron expression (seconds first).
pub fn parse_cron(expr: &str) -> Result<(), AppError> {
    let fields = expr.split_whitespace().count();
    if !(6..=7).contains(&fields) {
        return Err(AppError::configuration(format!(
            "Cron expression '{expr}' must have 6 or 7 fields (seconds first)"
        )));
    }
    for field in expr.split_whitespace() {
        let ok = field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '*' | '/' | ',' | '-' | '?' | '#'));
        if !ok {
            return Err(AppError::configuration(format!(
                "Cron field '{field}' in '{expr}' has invalid characters"
            )));
        }
    }
    Ok(())
}

/// Cron-based scheduler for the report dispatches.
pub struct ReportScheduler {
    scheduler: JobScheduler,
}

impl std::fmt::Debug for ReportScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportScheduler").finish()
    }
}

impl ReportScheduler {
    /// Create a new scheduler.
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;
        Ok(Self { scheduler })
    }

    /// Register the monthly attendance report.
    pub async fn register_monthly_report(
        &self,
        config: &WorkerConfig,
        job: MonthlyReportJob,
    ) -> Result<(), AppError> {
        parse_cron(&config.monthly_report_cron)?;
        let job = Arc::new(job);

        let cron = CronJob::new_async(config.monthly_report_cron.as_str(), move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                tracing::debug!("Running monthly report job");
                job.run_logged().await;
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Failed to create monthly_report schedule: {e}"))
        })?;

        self.scheduler.add(cron).await.map_err(|e| {
            AppError::internal(format!("Failed to add monthly_report schedule: {e}"))
        })?;

        tracing::info!(cron = %config.monthly_report_cron, "Registered: monthly_report");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;
        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Keep the scheduler running until `shutdown` flips to true.
    pub async fn run_until(self, mut shutdown: watch::Receiver<bool>) {
        while !*shutdown.borrow() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }
        if let Err(e) = self.shutdown().await {
            tracing::error!(error = %e, "Scheduler shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cron_accepted() {
        assert!(parse_cron(&WorkerConfig::default().monthly_report_cron).is_ok());
    }

    #[test]
    fn test_five_field_cron_rejected() {
        assert!(parse_cron("0 8 1 * *").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_cron("0 0 8 1 * $").is_err());
    }
}
