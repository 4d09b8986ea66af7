//! Opaque device token value.

use serde::{Deserialize, Serialize};
use std::fmt;

use portal_core::AppError;

const MAX_TOKEN_LEN: usize = 4096;

/// An opaque push-provider device token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PushToken(String);

impl PushToken {
    /// Validate and wrap a raw token.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(AppError::validation("Push token must not be empty"));
        }
        if token.len() > MAX_TOKEN_LEN {
            return Err(AppError::validation(format!(
                "Push token exceeds {MAX_TOKEN_LEN} bytes"
            )));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(AppError::validation("Push token must not contain whitespace"));
        }
        Ok(Self(token.to_string()))
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PushToken {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PushToken> for String {
    fn from(token: PushToken) -> Self {
        token.0
    }
}

impl fmt::Display for PushToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let token = PushToken::parse("  abc:123 ").unwrap();
        assert_eq!(token.as_str(), "abc:123");
    }

    #[test]
    fn test_parse_rejects_blank_and_whitespace() {
        assert!(PushToken::parse("   ").is_err());
        assert!(PushToken::parse("ab c").is_err());
    }
}
