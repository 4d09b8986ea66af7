//! Attendance event status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::decision::Decision;

/// Review state of an attendance event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Accepted automatically or by a reviewer.
    Approved,
    /// Awaiting a reviewer.
    Pending,
    /// Refused by a reviewer.
    Rejected,
}

impl AttendanceStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a reviewer decision has already been applied.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// The reviewer decision this status records, if decided.
    pub fn decision(&self) -> Option<Decision> {
        match self {
            Self::Approved => Some(Decision::Approved),
            Self::Rejected => Some(Decision::Rejected),
            Self::Pending => None,
        }
    }
}

impl From<Decision> for AttendanceStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "pending" => Ok(Self::Pending),
            "rejected" => Ok(Self::Rejected),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid attendance status: '{s}'"
            ))),
        }
    }
}
