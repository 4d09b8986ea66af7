//! Notification dispatch and channel provider configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Notification dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Maximum number of channel sends in flight for one dispatch.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Template slugs used by the built-in business events.
    #[serde(default)]
    pub templates: EventTemplates,
    /// Email provider.
    #[serde(default)]
    pub email: EmailChannelConfig,
    /// Messaging-app provider.
    #[serde(default)]
    pub messaging: MessagingChannelConfig,
    /// Push provider.
    #[serde(default)]
    pub push: PushChannelConfig,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            templates: EventTemplates::default(),
            email: EmailChannelConfig::default(),
            messaging: MessagingChannelConfig::default(),
            push: PushChannelConfig::default(),
        }
    }
}

impl NotifyConfig {
    /// An enabled channel must carry its provider credentials.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_concurrency == 0 {
            return Err(AppError::configuration(
                "notify.max_concurrency must be at least 1",
            ));
        }
        if self.email.enabled {
            require("notify.email.api_url", &self.email.api_url)?;
            require("notify.email.api_key", &self.email.api_key)?;
            require("notify.email.from_address", &self.email.from_address)?;
        }
        if self.messaging.enabled {
            require("notify.messaging.api_url", &self.messaging.api_url)?;
            require("notify.messaging.access_token", &self.messaging.access_token)?;
        }
        if self.push.enabled {
            require("notify.push.api_url", &self.push.api_url)?;
            require("notify.push.server_key", &self.push.server_key)?;
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::configuration(format!(
            "{field} is required when the channel is enabled"
        )));
    }
    Ok(())
}

/// Template slugs for the built-in events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTemplates {
    /// Sent to the applicant when a leave application is decided.
    #[serde(default = "default_leave_decision")]
    pub leave_decision: String,
    /// Sent to the employee when an attendance event is decided.
    #[serde(default = "default_attendance_decision")]
    pub attendance_decision: String,
    /// Sent to all active employees for a holiday.
    #[serde(default = "default_holiday_announcement")]
    pub holiday_announcement: String,
    /// Sent to the report roles by the monthly scheduled dispatch.
    #[serde(default = "default_monthly_report")]
    pub monthly_report: String,
}

impl Default for EventTemplates {
    fn default() -> Self {
        Self {
            leave_decision: default_leave_decision(),
            attendance_decision: default_attendance_decision(),
            holiday_announcement: default_holiday_announcement(),
            monthly_report: default_monthly_report(),
        }
    }
}

/// Transactional email HTTP API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailChannelConfig {
    /// Whether email delivery is attempted.
    #[serde(default)]
    pub enabled: bool,
    /// Send endpoint.
    #[serde(default)]
    pub api_url: String,
    /// Bearer API key.
    #[serde(default)]
    pub api_key: String,
    /// Sender address.
    #[serde(default)]
    pub from_address: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Messaging-app (WhatsApp-style business messaging) HTTP API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagingChannelConfig {
    /// Whether messaging delivery is attempted.
    #[serde(default)]
    pub enabled: bool,
    /// Messages endpoint.
    #[serde(default)]
    pub api_url: String,
    /// Bearer access token.
    #[serde(default)]
    pub access_token: String,
    /// Default country calling code prepended to local numbers (digits only).
    #[serde(default)]
    pub default_country_code: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Push provider HTTP API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushChannelConfig {
    /// Whether push delivery is available to broadcasts.
    #[serde(default)]
    pub enabled: bool,
    /// Send endpoint.
    #[serde(default)]
    pub api_url: String,
    /// Bearer server key.
    #[serde(default)]
    pub server_key: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_max_concurrency() -> usize {
    16
}

fn default_timeout() -> u64 {
    15
}

fn default_leave_decision() -> String {
    "leave-decision".to_string()
}

fn default_attendance_decision() -> String {
    "attendance-decision".to_string()
}

fn default_holiday_announcement() -> String {
    "holiday-announcement".to_string()
}

fn default_monthly_report() -> String {
    "monthly-attendance-report".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_channels_need_no_credentials() {
        assert!(NotifyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_enabled_email_without_key_rejected() {
        let mut config = NotifyConfig::default();
        config.email.enabled = true;
        config.email.api_url = "https://mail.example.com/send".to_string();
        config.email.from_address = "hr@example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("notify.email.api_key"));
    }

    #[test]
    fn test_enabled_push_with_credentials_accepted() {
        let mut config = NotifyConfig::default();
        config.push.enabled = true;
        config.push.api_url = "https://push.example.com/send".to_string();
        config.push.server_key = "key".to_string();
        assert!(config.validate().is_ok());
    }
}
