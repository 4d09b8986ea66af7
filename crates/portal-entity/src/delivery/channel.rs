//! Delivery channels and per-channel outcome counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One delivery mechanism for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Transactional email, addressed by email.
    Email,
    /// Messaging app, addressed by phone number.
    Messaging,
    /// Device push, addressed by registered token.
    Push,
}

impl Channel {
    /// Return the channel as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Messaging => "messaging",
            Self::Push => "push",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Channel {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "messaging" | "whatsapp" => Ok(Self::Messaging),
            "push" => Ok(Self::Push),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid channel: '{s}'. Expected one of: email, messaging, push"
            ))),
        }
    }
}

/// Outcome counts for one channel within one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTally {
    /// The channel.
    pub channel: Channel,
    /// Sends issued.
    pub attempted: u32,
    /// Sends the provider accepted.
    pub succeeded: u32,
    /// Sends that failed.
    pub failed: u32,
    /// Push tokens the provider reported as unregistered.
    #[serde(default)]
    pub invalid_tokens: u32,
}

impl ChannelTally {
    /// Zero counts for a channel.
    pub fn empty(channel: Channel) -> Self {
        Self {
            channel,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            invalid_tokens: 0,
        }
    }

    /// Count one settled send.
    pub fn record(&mut self, success: bool) {
        self.attempted += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
