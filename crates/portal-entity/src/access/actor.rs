//! The authenticated identity behind a request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical form of a role label: trimmed and lowercased.
///
/// Role labels arrive in whatever case the directory stored them
/// (`"Supervisor"`, `"HR"`), and are matched case-insensitively.
pub fn normalize_role(label: &str) -> String {
    label.trim().to_lowercase()
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Identity provider subject.
    pub uid: String,
    /// Verified email, if the credential carried one.
    pub email: Option<String>,
    /// Linked employee record, if the subject has one.
    pub employee_id: Option<Uuid>,
    /// Display name from the directory.
    pub name: Option<String>,
    /// Normalized role labels, deduplicated.
    pub roles: Vec<String>,
    /// Employee ids of direct subordinates.
    ///
    /// `None` means the lookup failed and the team is unknown.
    pub subordinate_ids: Option<Vec<String>>,
}

impl Actor {
    /// Build an actor with normalized role labels and a resolved team.
    pub fn new(
        uid: impl Into<String>,
        employee_id: Option<Uuid>,
        roles: impl IntoIterator<Item = impl AsRef<str>>,
        subordinate_ids: Option<Vec<String>>,
    ) -> Self {
        let mut labels: Vec<String> = roles
            .into_iter()
            .map(|r| normalize_role(r.as_ref()))
            .filter(|r| !r.is_empty())
            .collect();
        labels.sort();
        labels.dedup();

        Self {
            uid: uid.into(),
            email: None,
            employee_id,
            name: None,
            roles: labels,
            subordinate_ids,
        }
    }

    /// Attach the verified email.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    /// Attach the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether the actor carries the given label (case-insensitive).
    pub fn has_role(&self, label: &str) -> bool {
        let wanted = normalize_role(label);
        self.roles.iter().any(|r| *r == wanted)
    }

    /// The actor's own identity aliases: auth uid, then employee id.
    pub fn self_aliases(&self) -> Vec<String> {
        let mut aliases = vec![self.uid.clone()];
        if let Some(id) = self.employee_id {
            let id = id.to_string();
            if id != self.uid {
                aliases.push(id);
            }
        }
        aliases
    }

    /// Whether the subordinate lookup produced a usable answer.
    pub fn team_resolved(&self) -> bool {
        self.subordinate_ids.is_some()
    }

    /// Number of known subordinates; zero when unresolved.
    pub fn subordinate_count(&self) -> usize {
        self.subordinate_ids.as_ref().map_or(0, Vec::len)
    }

    /// Display label for logs and message variables.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_are_normalized_and_deduplicated() {
        let actor = Actor::new("uid-1", None, ["Supervisor", " supervisor ", "HR", ""], Some(vec![]));
        assert_eq!(actor.roles, vec!["hr".to_string(), "supervisor".to_string()]);
        assert!(actor.has_role("SUPERVISOR"));
    }

    #[test]
    fn test_self_aliases_include_employee_id() {
        let id = Uuid::new_v4();
        let actor = Actor::new("uid-1", Some(id), Vec::<String>::new(), Some(vec![]));
        assert_eq!(actor.self_aliases(), vec!["uid-1".to_string(), id.to_string()]);
    }

    #[test]
    fn test_unresolved_team_counts_zero() {
        let actor = Actor::new("uid-1", None, ["manager"], None);
        assert!(!actor.team_resolved());
        assert_eq!(actor.subordinate_count(), 0);
    }
}
