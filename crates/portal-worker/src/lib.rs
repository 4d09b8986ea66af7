//! # portal-worker
//!
//! Cron-driven dispatch units. Each job builds its message and hands it to
//! the same notification dispatcher the HTTP triggers use, so scheduled
//! sends produce ordinary delivery records.

pub mod jobs;
pub mod scheduler;

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use portal_core::config::WorkerConfig;
use portal_core::error::AppError;
use portal_service::MonthlyReportService;

pub use jobs::MonthlyReportJob;
pub use scheduler::ReportScheduler;

/// Start the scheduled dispatches and return the task that stops them on
/// shutdown. Returns `None` when the worker is disabled.
pub async fn spawn(
    config: &WorkerConfig,
    reports: Arc<MonthlyReportService>,
    shutdown: watch::Receiver<bool>,
) -> Result<Option<JoinHandle<()>>, AppError> {
    if !config.enabled {
        tracing::info!("Scheduled dispatches disabled");
        return Ok(None);
    }

    let scheduler = ReportScheduler::new().await?;
    scheduler
        .register_monthly_report(
            config,
            MonthlyReportJob::new(reports, config.report_roles.clone()),
        )
        .await?;
    scheduler.start().await?;

    Ok(Some(tokio::spawn(scheduler.run_until(shutdown))))
}
