//! Protected resource catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A record collection whose rows belong to one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Attendance check-in events.
    Attendance,
    /// Leave applications.
    Leave,
    /// Field visits.
    Visit,
    /// Expense claims.
    Claim,
    /// Projects.
    Project,
}

impl ResourceType {
    /// Every resource the capability model knows about.
    pub const ALL: [ResourceType; 5] = [
        Self::Attendance,
        Self::Leave,
        Self::Visit,
        Self::Claim,
        Self::Project,
    ];

    /// Return the resource as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attendance => "attendance",
            Self::Leave => "leave",
            Self::Visit => "visit",
            Self::Claim => "claim",
            Self::Project => "project",
        }
    }

    /// Backing table.
    pub fn table(&self) -> &'static str {
        match self {
            Self::Attendance => "attendance_events",
            Self::Leave => "leave_applications",
            Self::Visit => "visits",
            Self::Claim => "expense_claims",
            Self::Project => "projects",
        }
    }

    /// Column holding the owning employee's identity alias.
    pub fn subject_column(&self) -> &'static str {
        "employee_ref"
    }

    /// Column used for the time bound and the descending order.
    pub fn date_column(&self) -> &'static str {
        match self {
            Self::Attendance => "checked_in_at",
            Self::Visit => "visited_at",
            Self::Claim => "submitted_at",
            Self::Leave | Self::Project => "created_at",
        }
    }

    /// Whether approving this resource is reserved to org-wide viewers.
    ///
    /// Claims are a financial control point: supervisors may see their
    /// team's claims but only org-wide roles may approve them.
    pub fn approval_requires_org_wide(&self) -> bool {
        matches!(self, Self::Claim)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = portal_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attendance" => Ok(Self::Attendance),
            "leave" => Ok(Self::Leave),
            "visit" => Ok(Self::Visit),
            "claim" => Ok(Self::Claim),
            "project" => Ok(Self::Project),
            _ => Err(portal_core::AppError::validation(format!(
                "Invalid resource: '{s}'. Expected one of: attendance, leave, visit, claim, project"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_catalogue() {
        for resource in ResourceType::ALL {
            assert_eq!(resource.as_str().parse::<ResourceType>().ok(), Some(resource));
        }
        assert!("payroll".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_only_claims_need_org_wide_approval() {
        let restricted: Vec<_> = ResourceType::ALL
            .into_iter()
            .filter(ResourceType::approval_requires_org_wide)
            .collect();
        assert_eq!(restricted, vec![ResourceType::Claim]);
    }
}
