//! Configuration inspection commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use portal_auth::AccessPolicy;
use portal_core::error::AppError;
use portal_database::connection::mask_password;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Validate the configuration file and role table
    Check,
    /// Show the loaded configuration with secrets masked
    Show,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Check => {
            let config = match super::load_config(config_path) {
                Ok(config) => config,
                Err(e) => {
                    output::print_error(&format!("Configuration invalid: {e}"));
                    return Err(e);
                }
            };
            AccessPolicy::from_config(&config.access)?;

            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Server", &config.server.bind_address());
            output::print_kv("Database", &mask_password(&config.database.url));
            output::print_kv("Roles", &config.access.roles.len().to_string());
            output::print_kv("Email", enabled(config.notify.email.enabled));
            output::print_kv("Messaging", enabled(config.notify.messaging.enabled));
            output::print_kv("Push", enabled(config.notify.push.enabled));
            output::print_kv("Report schedule", &config.worker.monthly_report_cron);
        }
        ConfigCommand::Show => {
            let mut config = super::load_config(config_path)?;
            config.database.url = mask_password(&config.database.url);
            config.auth.jwt_secret = "****".to_string();
            config.notify.email.api_key = mask(&config.notify.email.api_key);
            config.notify.messaging.access_token = mask(&config.notify.messaging.access_token);
            config.notify.push.server_key = mask(&config.notify.push.server_key);
            match format {
                OutputFormat::Json => output::print_json(&config, "{}"),
                OutputFormat::Table => println!("{config:#?}"),
            }
        }
    }

    Ok(())
}

fn enabled(flag: bool) -> &'static str {
    if flag { "enabled" } else { "disabled" }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "****".to_string()
    }
}
