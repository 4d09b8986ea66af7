//! System-level actions that are not tied to a single record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Organisation-level operations granted by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemAction {
    /// Create holidays and announce them to all employees.
    AnnounceHoliday,
    /// Send ad-hoc broadcasts.
    SendBroadcast,
    /// Create and edit message templates.
    ManageTemplates,
    /// Create and edit geofenced sites.
    ManageSites,
    /// Read the delivery audit log.
    ViewDeliveryLog,
}

impl SystemAction {
    /// Every action the policy knows about.
    pub const ALL: [SystemAction; 5] = [
        Self::AnnounceHoliday,
        Self::SendBroadcast,
        Self::ManageTemplates,
        Self::ManageSites,
        Self::ViewDeliveryLog,
    ];

    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnnounceHoliday => "announce_holiday",
            Self::SendBroadcast => "send_broadcast",
            Self::ManageTemplates => "manage_templates",
            Self::ManageSites => "manage_sites",
            Self::ViewDeliveryLog => "view_delivery_log",
        }
    }
}

impl fmt::Display for SystemAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SystemAction {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s.trim())
            .ok_or_else(|| {
                portal_core::AppError::validation(format!("Invalid system action: '{s}'"))
            })
    }
}
