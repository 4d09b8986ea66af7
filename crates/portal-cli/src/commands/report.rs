//! Scheduled report CLI commands.

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use portal_core::error::AppError;
use portal_service::ReportPeriod;

/// Arguments for report commands
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Report subcommand
    #[command(subcommand)]
    pub command: ReportCommand,
}

/// Report subcommands
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    /// Send the previous month's attendance report now
    Send {
        /// Override the configured recipient roles
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}

/// Execute report commands
pub async fn execute(
    args: &ReportArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ReportCommand::Send { roles } => {
            let config = super::load_config(config_path)?;
            let roles = if roles.is_empty() {
                config.worker.report_roles.clone()
            } else {
                roles.clone()
            };
            let now = Utc::now();
            let period = ReportPeriod::previous_month(now)?;
            output::print_kv("Period", &period.label);
            output::print_kv("Roles", &roles.join(", "));

            let pool = super::create_db_pool(&config).await?;
            let state = portal_api::AppState::build(config, pool)?;
            let reports = Arc::clone(&state.report_service);
            let summary = reports.send(now, &roles).await?;
            super::broadcast::print_summary(&summary, format);
        }
    }

    Ok(())
}
