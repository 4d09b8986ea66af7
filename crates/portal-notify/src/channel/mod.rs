//! Delivery channel providers.
//!
//! Every provider is a plain "send to one address" call; retry and rate
//! limiting are the provider's concern.

pub mod email;
pub mod messaging;
pub mod push;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use portal_core::config::NotifyConfig;
use portal_core::error::AppError;
use portal_entity::delivery::Channel;

use crate::error::ChannelSendError;

pub use email::EmailProvider;
pub use messaging::MessagingProvider;
pub use push::PushProvider;

/// Maximum provider response body kept in an error.
const MAX_ERROR_BODY: usize = 512;

/// What one provider call delivers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Subject or notification title.
    pub subject: String,
    /// Body text.
    pub body: String,
    /// Badge count for push.
    pub badge: Option<u32>,
    /// Click-through destination for push.
    pub link: Option<String>,
}

/// One delivery mechanism.
#[async_trait]
pub trait ChannelProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The channel this provider serves.
    fn channel(&self) -> Channel;

    /// Deliver to one address (email, phone number or push token).
    async fn send(&self, address: &str, message: &OutboundMessage)
    -> Result<(), ChannelSendError>;
}

/// The providers enabled for this deployment.
#[derive(Debug, Clone, Default)]
pub struct ChannelSet {
    email: Option<Arc<dyn ChannelProvider>>,
    messaging: Option<Arc<dyn ChannelProvider>>,
    push: Option<Arc<dyn ChannelProvider>>,
}

impl ChannelSet {
    /// Build HTTP providers for every enabled channel.
    pub fn from_config(config: &NotifyConfig) -> Result<Self, AppError> {
        let mut set = Self::default();
        if config.email.enabled {
            set.email = Some(Arc::new(EmailProvider::new(config.email.clone())?));
        }
        if config.messaging.enabled {
            set.messaging = Some(Arc::new(MessagingProvider::new(config.messaging.clone())?));
        }
        if config.push.enabled {
            set.push = Some(Arc::new(PushProvider::new(config.push.clone())?));
        }
        tracing::info!(
            email = set.email.is_some(),
            messaging = set.messaging.is_some(),
            push = set.push.is_some(),
            "Notification channels configured"
        );
        Ok(set)
    }

    /// Register a provider under its own channel, replacing any existing one.
    pub fn with_provider(mut self, provider: Arc<dyn ChannelProvider>) -> Self {
        match provider.channel() {
            Channel::Email => self.email = Some(provider),
            Channel::Messaging => self.messaging = Some(provider),
            Channel::Push => self.push = Some(provider),
        }
        self
    }

    /// Provider for a channel, if enabled.
    pub fn get(&self, channel: Channel) -> Option<&Arc<dyn ChannelProvider>> {
        match channel {
            Channel::Email => self.email.as_ref(),
            Channel::Messaging => self.messaging.as_ref(),
            Channel::Push => self.push.as_ref(),
        }
    }

    /// Whether a channel has a provider.
    pub fn is_enabled(&self, channel: Channel) -> bool {
        self.get(channel).is_some()
    }
}

/// Shared HTTP client with a per-request timeout.
pub(crate) fn http_client(timeout_seconds: u64) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()
        .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))
}

/// Turn a non-success response into [`ChannelSendError::Rejected`].
pub(crate) async fn reject(response: reqwest::Response) -> ChannelSendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ChannelSendError::Rejected {
        status,
        body: truncate_body(body),
    }
}

/// Cut a provider error body down to [`MAX_ERROR_BODY`] bytes.
pub(crate) fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
