//! Leave application status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decision::Decision;

/// Review state of a leave application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "leave_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    /// Awaiting a reviewer.
    Pending,
    /// Granted.
    Approved,
    /// Refused.
    Rejected,
}

impl LeaveStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a reviewer decision has already been applied.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The decision this status records, if terminal.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Self::Pending => None,
            Self::Approved => Some(Decision::Approved),
            Self::Rejected => Some(Decision::Rejected),
        }
    }
}

impl From<Decision> for LeaveStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
