//! Dispatch error types.

use thiserror::Error;

use portal_core::AppError;
use portal_entity::delivery::Channel;

/// A fault that prevents a dispatch from starting.
///
/// Always surfaced to the caller and never retried: retrying cannot fix
/// missing input or configuration.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A required request field is missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// No template is stored under the slug.
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),
    /// The request needs a channel that has no configured provider.
    #[error("Channel '{0}' is not configured")]
    ChannelUnavailable(Channel),
    /// A store lookup needed to set up the dispatch failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Store(inner) => inner,
            other => AppError::setup(other.to_string()),
        }
    }
}

/// A single provider call that failed.
///
/// Recorded in the per-channel counts; never raised and never retried
/// within the same dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelSendError {
    /// The request did not complete (connect, timeout, body read).
    #[error("Request failed: {0}")]
    Transport(String),
    /// The provider answered with an error.
    #[error("Provider returned {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },
    /// The address could not be turned into a deliverable one.
    #[error("Undeliverable address: {0}")]
    InvalidAddress(String),
    /// The push provider reported the token as unregistered.
    #[error("Push token is no longer registered")]
    InvalidToken,
}

impl ChannelSendError {
    /// Whether the failure means the push token should be pruned.
    pub fn is_invalid_token(&self) -> bool {
        matches!(self, Self::InvalidToken)
    }
}

impl From<reqwest::Error> for ChannelSendError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::error::ErrorKind;

    #[test]
    fn test_setup_faults_map_to_setup_kind() {
        let err: AppError = DispatchError::TemplateNotFound("welcome".into()).into();
        assert_eq!(err.kind, ErrorKind::Setup);
        assert_eq!(err.message, "Template 'welcome' not found");

        let err: AppError = DispatchError::ChannelUnavailable(Channel::Push).into();
        assert_eq!(err.kind, ErrorKind::Setup);
    }

    #[test]
    fn test_store_faults_keep_their_kind() {
        let err: AppError = DispatchError::Store(AppError::database("down")).into();
        assert_eq!(err.kind, ErrorKind::Database);
    }
}
