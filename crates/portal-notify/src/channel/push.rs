//! Device push addressed by registered token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use portal_core::config::notify::PushChannelConfig;
use portal_core::error::AppError;
use portal_entity::delivery::Channel;

use crate::error::ChannelSendError;

use super::{ChannelProvider, OutboundMessage, http_client, truncate_body};

/// Provider error codes meaning the token will never work again.
const UNREGISTERED_CODES: &[&str] = &[
    "NotRegistered",
    "InvalidRegistration",
    "UNREGISTERED",
    "Unregistered",
    "DeviceTokenNotForTopic",
    "BadDeviceToken",
];

#[derive(Debug, Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    click_action: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PushPayload<'a> {
    to: &'a str,
    notification: Notification<'a>,
}

/// Response body in any of the shapes push gateways use.
#[derive(Debug, Default, Deserialize)]
struct PushResponse {
    #[serde(default)]
    results: Vec<PushResult>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    error: Option<ErrorField>,
}

#[derive(Debug, Default, Deserialize)]
struct PushResult {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Code(String),
    Detail {
        #[serde(default)]
        details: Vec<ErrorDetail>,
    },
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default, rename = "errorCode")]
    error_code: Option<String>,
}

impl PushResponse {
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Every error code the body carries, per-token results first.
    fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self
            .results
            .iter()
            .filter_map(|r| r.error.as_deref())
            .collect();
        codes.extend(self.reason.as_deref());
        match &self.error {
            Some(ErrorField::Code(code)) => codes.push(code.as_str()),
            Some(ErrorField::Detail { details }) => {
                codes.extend(details.iter().filter_map(|d| d.error_code.as_deref()));
            }
            None => {}
        }
        codes
    }
}

/// Sends push notifications to one device token at a time.
#[derive(Debug, Clone)]
pub struct PushProvider {
    client: reqwest::Client,
    config: PushChannelConfig,
}

impl PushProvider {
    /// Build a provider from its channel configuration.
    pub fn new(config: PushChannelConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: http_client(config.timeout_seconds)?,
            config,
        })
    }
}

/// Classify a per-token error code from the provider.
fn classify(status: u16, code: &str) -> ChannelSendError {
    if UNREGISTERED_CODES.contains(&code) {
        ChannelSendError::InvalidToken
    } else {
        ChannelSendError::Rejected {
            status,
            body: code.to_string(),
        }
    }
}

/// Classify a gateway response.
///
/// A token is only reported invalid when the body names an unregistered
/// code. A bare 404 or 410 (wrong URL, proxy) is a plain rejection.
fn classify_response(status: u16, body: &str) -> Result<(), ChannelSendError> {
    let parsed = PushResponse::parse(body);
    let codes = parsed.codes();

    if (200..300).contains(&status) {
        // A 200 can still carry a per-token failure.
        return match codes.first() {
            Some(code) => Err(classify(status, code)),
            None => Ok(()),
        };
    }

    if (status == 404 || status == 410) && codes.iter().any(|c| UNREGISTERED_CODES.contains(c)) {
        return Err(ChannelSendError::InvalidToken);
    }

    Err(ChannelSendError::Rejected {
        status,
        body: truncate_body(body.to_string()),
    })
}

#[async_trait]
impl ChannelProvider for PushProvider {
    fn channel(&self) -> Channel {
        Channel::Push
    }

    async fn send(
        &self,
        address: &str,
        message: &OutboundMessage,
    ) -> Result<(), ChannelSendError> {
        let payload = PushPayload {
            to: address,
            notification: Notification {
                title: &message.subject,
                body: &message.body,
                badge: message.badge,
                click_action: message.link.as_deref(),
            },
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.server_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        classify_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_codes_mean_invalid_token() {
        assert_eq!(classify(200, "NotRegistered"), ChannelSendError::InvalidToken);
        assert_eq!(classify(200, "UNREGISTERED"), ChannelSendError::InvalidToken);
    }

    #[test]
    fn test_other_codes_are_plain_failures() {
        assert!(matches!(
            classify(200, "MessageTooBig"),
            ChannelSendError::Rejected { status: 200, .. }
        ));
    }

    #[test]
    fn test_response_without_results_parses() {
        let body: PushResponse = serde_json::from_str(r#"{"success":1}"#).unwrap();
        assert!(body.results.is_empty());
    }

    #[test]
    fn test_success_without_errors_is_delivered() {
        assert_eq!(classify_response(200, r#"{"success":1}"#), Ok(()));
        assert_eq!(classify_response(200, ""), Ok(()));
    }

    #[test]
    fn test_success_with_unregistered_result_is_invalid_token() {
        let body = r#"{"results":[{"error":"NotRegistered"}]}"#;
        assert_eq!(classify_response(200, body), Err(ChannelSendError::InvalidToken));
    }

    #[test]
    fn test_bare_not_found_is_not_an_invalid_token() {
        for status in [404, 410] {
            let outcome = classify_response(status, "<html>Not Found</html>");
            assert!(matches!(
                outcome,
                Err(ChannelSendError::Rejected { status: s, .. }) if s == status
            ));
        }
        assert!(matches!(
            classify_response(404, ""),
            Err(ChannelSendError::Rejected { status: 404, .. })
        ));
    }

    #[test]
    fn test_not_found_with_unknown_code_is_rejected() {
        let body = r#"{"error":{"status":"NOT_FOUND","details":[{"errorCode":"SENDER_ID_MISMATCH"}]}}"#;
        assert!(matches!(
            classify_response(404, body),
            Err(ChannelSendError::Rejected { status: 404, .. })
        ));
    }

    #[test]
    fn test_not_found_naming_unregistered_token_is_invalid() {
        let fcm = r#"{"error":{"code":404,"status":"NOT_FOUND","details":[{"errorCode":"UNREGISTERED"}]}}"#;
        assert_eq!(classify_response(404, fcm), Err(ChannelSendError::InvalidToken));

        let apns = r#"{"reason":"Unregistered"}"#;
        assert_eq!(classify_response(410, apns), Err(ChannelSendError::InvalidToken));
    }

    #[test]
    fn test_server_error_is_rejected() {
        assert!(matches!(
            classify_response(503, "unavailable"),
            Err(ChannelSendError::Rejected { status: 503, .. })
        ));
    }
}
