//! Dispatch outcome status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall outcome of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "delivery_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// At least one channel send succeeded.
    Sent,
    /// No send was attempted: empty audience or nobody reachable.
    NoTargets,
    /// Sends were attempted and none succeeded.
    Failed,
}

impl DeliveryStatus {
    /// Derive the status from attempt totals.
    pub fn from_counts(attempted: u32, succeeded: u32) -> Self {
        if attempted == 0 {
            Self::NoTargets
        } else if succeeded > 0 {
            Self::Sent
        } else {
            Self::Failed
        }
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::NoTargets => "no_targets",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_counts() {
        assert_eq!(DeliveryStatus::from_counts(0, 0), DeliveryStatus::NoTargets);
        assert_eq!(DeliveryStatus::from_counts(4, 0), DeliveryStatus::Failed);
        assert_eq!(DeliveryStatus::from_counts(4, 1), DeliveryStatus::Sent);
    }
}
