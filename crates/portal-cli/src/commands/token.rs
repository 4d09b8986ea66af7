//! Bearer token minting for local testing.

use clap::{Args, Subcommand};

use portal_auth::JwtEncoder;
use portal_core::error::AppError;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Sign a bearer token for an identity uid
    Issue {
        /// Identity uid (token subject)
        uid: String,
        /// Email claim
        #[arg(short, long)]
        email: Option<String>,
        /// Lifetime in minutes (defaults to auth.dev_token_ttl_minutes)
        #[arg(short, long)]
        ttl: Option<i64>,
    },
}

/// Execute token commands
pub async fn execute(args: &TokenArgs, config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;

    match &args.command {
        TokenCommand::Issue { uid, email, ttl } => {
            let ttl = ttl.unwrap_or(config.auth.dev_token_ttl_minutes);
            if ttl <= 0 {
                return Err(AppError::validation("Token lifetime must be positive"));
            }
            let token = JwtEncoder::new(&config.auth).issue(uid, email.as_deref(), ttl)?;
            eprintln!("Token for '{uid}' valid for {ttl} minutes");
            println!("{token}");
        }
    }

    Ok(())
}
