//! Employee entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::EmployeeStatus;

/// An employee record in the directory.
///
/// Records in other collections reference an employee either by `id` or by
/// `auth_uid`; both are treated as aliases of the same person.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    /// Employee record identifier.
    pub id: Uuid,
    /// Identity provider subject.
    pub auth_uid: String,
    /// Display name.
    pub full_name: String,
    /// Email address, if any.
    pub email: Option<String>,
    /// Phone number for messaging delivery, if any.
    pub phone: Option<String>,
    /// Role labels (a set, not a hierarchy).
    pub roles: Vec<String>,
    /// Direct supervisor's employee id.
    pub supervisor_id: Option<Uuid>,
    /// Employment status.
    pub status: EmployeeStatus,
    /// Registered push-delivery tokens.
    #[serde(skip_serializing)]
    pub push_tokens: Vec<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Whether this employee belongs in active audiences.
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Project the directory entry onto the fields a dispatch needs.
    pub fn to_recipient(&self) -> Recipient {
        Recipient {
            employee_id: self.id,
            name: self.full_name.clone(),
            email: non_blank(self.email.as_deref()),
            phone: non_blank(self.phone.as_deref()),
            push_tokens: self.push_tokens.clone(),
        }
    }
}

/// A resolved notification recipient with its contact addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Employee record identifier.
    pub employee_id: Uuid,
    /// Display name, available to templates as `{{name}}`.
    pub name: String,
    /// Email address.
    pub email: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Push-delivery tokens.
    pub push_tokens: Vec<String>,
}

impl Recipient {
    /// Whether any contact field or device token is present.
    pub fn is_reachable(&self) -> bool {
        self.email.is_some() || self.phone.is_some() || !self.push_tokens.is_empty()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(email: Option<&str>, phone: Option<&str>) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            auth_uid: "uid-1".to_string(),
            full_name: "Asha Rao".to_string(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            roles: vec!["employee".to_string()],
            supervisor_id: None,
            status: EmployeeStatus::Active,
            push_tokens: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_blank_contacts_are_dropped() {
        let recipient = employee(Some("  "), Some("")).to_recipient();
        assert_eq!(recipient.email, None);
        assert_eq!(recipient.phone, None);
        assert!(!recipient.is_reachable());
    }

    #[test]
    fn test_contacts_are_trimmed() {
        let recipient = employee(Some(" asha@example.com "), None).to_recipient();
        assert_eq!(recipient.email.as_deref(), Some("asha@example.com"));
        assert!(recipient.is_reachable());
    }
}
