//! Scheduled dispatch configuration.

use serde::{Deserialize, Serialize};

/// Cron-triggered dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether scheduled dispatches run in this process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Six-field cron expression for the monthly attendance report.
    #[serde(default = "default_monthly_report_cron")]
    pub monthly_report_cron: String,
    /// Role labels that receive the monthly report.
    #[serde(default = "default_report_roles")]
    pub report_roles: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            monthly_report_cron: default_monthly_report_cron(),
            report_roles: default_report_roles(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_monthly_report_cron() -> String {
    "0 0 8 1 * *".to_string()
}

fn default_report_roles() -> Vec<String> {
    vec!["admin".to_string(), "hr".to_string()]
}
