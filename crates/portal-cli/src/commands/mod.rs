//! CLI command definitions and dispatch.

pub mod broadcast;
pub mod config;
pub mod delivery;
pub mod migrate;
pub mod report;
pub mod serve;
pub mod template;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use portal_core::config::AppConfig;
use portal_core::error::AppError;

/// Business portal: role-scoped records and notification dispatch
#[derive(Debug, Parser)]
#[command(name = "portal", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the portal server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration checks
    Config(config::ConfigArgs),
    /// Notification templates
    Template(template::TemplateArgs),
    /// Send a broadcast
    Broadcast(broadcast::BroadcastArgs),
    /// Delivery log
    Delivery(delivery::DeliveryArgs),
    /// Scheduled reports
    Report(report::ReportArgs),
    /// Bearer tokens for local testing
    Token(token::TokenArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
            Commands::Template(args) => template::execute(args, &self.config, self.format).await,
            Commands::Broadcast(args) => broadcast::execute(args, &self.config, self.format).await,
            Commands::Delivery(args) => delivery::execute(args, &self.config, self.format).await,
            Commands::Report(args) => report::execute(args, &self.config, self.format).await,
            Commands::Token(args) => token::execute(args, &self.config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_from(config_path)
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<sqlx::PgPool, AppError> {
    let pool = portal_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}

/// Parse a `key=value` pair.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_var_splits_on_first_equals() {
        assert_eq!(
            parse_var("link=a=b").unwrap(),
            ("link".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn test_parse_var_requires_key() {
        assert!(parse_var("=x").is_err());
        assert!(parse_var("novalue").is_err());
    }

    #[test]
    fn test_broadcast_args_parse() {
        let cli = Cli::try_parse_from([
            "portal", "broadcast", "--title", "Office closed", "--body", "See you Monday",
            "--role", "hr", "--to", "uid-1", "--yes",
        ])
        .unwrap();
        match cli.command {
            Commands::Broadcast(args) => {
                assert_eq!(args.roles, vec!["hr".to_string()]);
                assert_eq!(args.recipients, vec!["uid-1".to_string()]);
                assert!(!args.everyone);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
