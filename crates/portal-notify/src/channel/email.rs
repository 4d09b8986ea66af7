//! Transactional email over an HTTP API.

use async_trait::async_trait;
use serde::Serialize;

use portal_core::config::notify::EmailChannelConfig;
use portal_core::error::AppError;
use portal_entity::delivery::Channel;

use crate::error::ChannelSendError;

use super::{ChannelProvider, OutboundMessage, http_client, reject};

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends plain-text email through the configured provider.
#[derive(Debug, Clone)]
pub struct EmailProvider {
    client: reqwest::Client,
    config: EmailChannelConfig,
}

impl EmailProvider {
    /// Build a provider from its channel configuration.
    pub fn new(config: EmailChannelConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            config,
        })
    }
}

#[async_trait]
impl ChannelProvider for EmailProvider {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    async fn send(
        &self,
        address: &str,
        message: &OutboundMessage,
    ) -> Result<(), ChannelSendError> {
        if !address.contains('@') {
            return Err(ChannelSendError::InvalidAddress(address.to_string()));
        }

        let payload = EmailPayload {
            from: &self.config.from_address,
            to: address,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
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
