//! Messaging-app delivery addressed by phone number.

use async_trait::async_trait;
use serde::Serialize;

use portal_core::config::notify::MessagingChannelConfig;
use portal_core::error::AppError;
use portal_entity::delivery::Channel;

use crate::error::ChannelSendError;

use super::{ChannelProvider, OutboundMessage, http_client, reject};

/// Shortest number accepted after normalisation.
const MIN_DIGITS: usize = 8;
/// Length of a national number that needs the default country code.
const NATIONAL_DIGITS: usize = 10;

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

/// Sends text messages through a business messaging API.
#[derive(Debug, Clone)]
pub struct MessagingProvider {
    client: reqwest::Client,
    config: MessagingChannelConfig,
}

impl MessagingProvider {
    /// Build a provider from its channel configuration.
    pub fn new(config: MessagingChannelConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            config,
        })
    }
}

/// Normalise a phone number to international digits.
///
/// Separators are dropped. A bare national number gets the default
/// country code. Returns `None` for anything too short to dial.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Option<String> {
    let trimmed = raw.trim();
    let international = trimmed.starts_with('+') || trimmed.starts_with("00");
    let mut digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if trimmed.starts_with("00") {
        digits.drain(..2);
    }
    if !international && digits.len() == NATIONAL_DIGITS + 1 && digits.starts_with('0') {
        digits.remove(0);
    }
    if !international && digits.len() == NATIONAL_DIGITS {
        let code: String = default_country_code
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        digits = format!("{code}{digits}");
    }
    (digits.len() >= MIN_DIGITS).then_some(digits)
}

#[async_trait]
impl ChannelProvider for MessagingProvider {
    fn channel(&self) -> Channel {
        Channel::Messaging
    }

    async fn send(
        &self,
        address: &str,
        message: &OutboundMessage,
    ) -> Result<(), ChannelSendError> {
        let to = normalize_phone(address, &self.config.default_country_code)
            .ok_or_else(|| ChannelSendError::InvalidAddress(address.to_string()))?;

        let payload = MessagePayload {
            messaging_product: "whatsapp",
            to: &to,
            kind: "text",
            text: TextBody {
                body: format!("*{}*\n{}", message.subject, message.body),
                preview_url: message.link.as_deref().map(|_| "true"),
            },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.access_token)
            .json(&payload)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(reject(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_number_gets_country_code() {
        assert_eq!(
            normalize_phone("98765 43210", "+91").as_deref(),
            Some("919876543210")
        );
        assert_eq!(
            normalize_phone("09876543210", "91").as_deref(),
            Some("919876543210")
        );
    }

    #[test]
    fn test_international_number_kept() {
        assert_eq!(
            normalize_phone("+44 20 7946 0958", "91").as_deref(),
            Some("442079460958")
        );
        assert_eq!(
            normalize_phone("0044 20 7946 0958", "91").as_deref(),
            Some("442079460958")
        );
    }

    #[test]
    fn test_short_number_rejected() {
        assert_eq!(normalize_phone("12-34", "91"), None);
    }
}
