//! Expansion of a dispatch audience into concrete recipients.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use portal_core::result::AppResult;
use portal_entity::employee::Recipient;

use crate::store::DirectoryStore;

/// Who a dispatch is addressed to.
///
/// Explicit identities and role labels are unioned. `everyone` means all
/// active employees and makes the other two irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audience {
    /// Identity aliases (auth uid or employee id).
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Role labels expanded against the directory.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Every active employee.
    #[serde(default)]
    pub everyone: bool,
}

impl Audience {
    /// All active employees.
    pub fn everyone() -> Self {
        Self {
            everyone: true,
            ..Self::default()
        }
    }

    /// Explicit identities.
    pub fn recipients(ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            recipients: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Holders of any of the role labels.
    pub fn roles(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            roles: labels.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether the audience names nobody at all.
    pub fn is_empty(&self) -> bool {
        !self.everyone
            && self.recipients.iter().all(|r| r.trim().is_empty())
            && self.roles.iter().all(|r| r.trim().is_empty())
    }
}

/// Resolves an [`Audience`] against the employee directory.
#[derive(Clone)]
pub struct AudienceResolver {
    directory: Arc<dyn DirectoryStore>,
}

impl std::fmt::Debug for AudienceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudienceResolver").finish_non_exhaustive()
    }
}

impl AudienceResolver {
    /// Create a resolver over the directory.
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }

    /// Active recipients, one per employee, in directory order.
    pub async fn resolve(&self, audience: &Audience) -> AppResult<Vec<Recipient>> {
        let employees = if audience.everyone {
            self.directory.active_employees().await?
        } else {
            let ids = clean(&audience.recipients);
            let roles = clean(&audience.roles);
            let mut found = Vec::new();
            if !ids.is_empty() {
                found.extend(self.directory.active_by_aliases(&ids).await?);
            }
            if !roles.is_empty() {
                found.extend(self.directory.active_by_roles(&roles).await?);
            }
            found
        };

        let mut seen = HashSet::new();
        Ok(employees
            .into_iter()
            .filter(|e| e.is_active() && seen.insert(e.id))
            .map(|e| e.to_recipient())
            .collect())
    }
}

fn clean(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_audience_is_empty() {
        assert!(Audience::default().is_empty());
        assert!(Audience::recipients([" "]).is_empty());
        assert!(!Audience::roles(["hr"]).is_empty());
        assert!(!Audience::everyone().is_empty());
    }

    #[test]
    fn test_clean_trims_and_deduplicates() {
        let values = vec![" a".to_string(), "a".to_string(), "".to_string(), "b".to_string()];
        assert_eq!(clean(&values), vec!["a".to_string(), "b".to_string()]);
    }
}
