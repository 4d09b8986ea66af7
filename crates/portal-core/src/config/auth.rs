//! Bearer credential verification configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Identity verification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret for HS256 token verification.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Expected `iss` claim. Not checked when unset.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Clock skew tolerance in seconds.
    #[serde(default = "default_leeway")]
    pub leeway_seconds: u64,
    /// Lifetime of tokens minted by the CLI, in minutes.
    #[serde(default = "default_dev_token_ttl")]
    pub dev_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            issuer: None,
            leeway_seconds: default_leeway(),
            dev_token_ttl_minutes: default_dev_token_ttl(),
        }
    }
}

impl AuthConfig {
    /// Reject an empty signing secret.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.jwt_secret == default_jwt_secret() {
            tracing::warn!("auth.jwt_secret is the built-in placeholder; set a real secret");
        }
        Ok(())
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_leeway() -> u64 {
    5
}

fn default_dev_token_ttl() -> i64 {
    60
}
