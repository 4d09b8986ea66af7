//! Role table and scope limits.
//!
//! Every role label the portal recognises is enumerated here together with
//! its effect. Names are plain strings at this layer; the access policy in
//! `portal-auth` checks them against the resource and action catalogues at
//! startup.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Access control configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Maximum number of identities in one "contains any" predicate.
    ///
    /// Matches the disjunction limit of the document store the records
    /// were migrated from. Teams larger than this are truncated.
    #[serde(default = "default_max_scope_identities")]
    pub max_scope_identities: usize,
    /// Look-back window per resource name, in days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: BTreeMap<String, u32>,
    /// Recognised role labels (lowercase) and their effect.
    #[serde(default = "default_roles")]
    pub roles: BTreeMap<String, RoleDefinition>,
}

/// The effect of holding one role label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Resource names this role may view organisation-wide.
    #[serde(default)]
    pub org_wide: Vec<String>,
    /// Whether this label marks a supervisor of some team.
    #[serde(default)]
    pub supervisory: bool,
    /// System action names granted by this role.
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            max_scope_identities: default_max_scope_identities(),
            lookback_days: default_lookback_days(),
            roles: default_roles(),
        }
    }
}

impl AccessConfig {
    /// Shape checks that do not need the resource catalogue.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_scope_identities == 0 {
            return Err(AppError::configuration(
                "access.max_scope_identities must be at least 1",
            ));
        }
        if self.roles.is_empty() {
            return Err(AppError::configuration("access.roles must not be empty"));
        }
        for name in self.roles.keys() {
            if name.trim().is_empty() {
                return Err(AppError::configuration("access.roles contains an empty role name"));
            }
            if name.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(AppError::configuration(format!(
                    "access.roles key '{name}' must be lowercase"
                )));
            }
        }
        Ok(())
    }
}

fn default_max_scope_identities() -> usize {
    30
}

fn default_lookback_days() -> BTreeMap<String, u32> {
    BTreeMap::from([("attendance".to_string(), 30)])
}

fn all_resources() -> Vec<String> {
    ["attendance", "leave", "visit", "claim", "project"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn admin_actions() -> Vec<String> {
    [
        "announce_holiday",
        "send_broadcast",
        "manage_templates",
        "manage_sites",
        "view_delivery_log",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn supervisory() -> RoleDefinition {
    RoleDefinition {
        supervisory: true,
        ..RoleDefinition::default()
    }
}

fn default_roles() -> BTreeMap<String, RoleDefinition> {
    BTreeMap::from([
        (
            "admin".to_string(),
            RoleDefinition {
                org_wide: all_resources(),
                supervisory: false,
                actions: admin_actions(),
            },
        ),
        (
            "hr".to_string(),
            RoleDefinition {
                org_wide: all_resources(),
                supervisory: false,
                actions: admin_actions(),
            },
        ),
        (
            "accounts".to_string(),
            RoleDefinition {
                org_wide: vec!["claim".to_string()],
                supervisory: false,
                actions: Vec::new(),
            },
        ),
        ("supervisor".to_string(), supervisory()),
        ("manager".to_string(), supervisory()),
        ("demomanager".to_string(), supervisory()),
        ("employee".to_string(), RoleDefinition::default()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let config = AccessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_scope_identities, 30);
        assert_eq!(config.lookback_days.get("attendance"), Some(&30));
        assert!(config.roles["supervisor"].supervisory);
        assert_eq!(config.roles["accounts"].org_wide, vec!["claim".to_string()]);
    }

    #[test]
    fn test_zero_ceiling_rejected() {
        let config = AccessConfig {
            max_scope_identities: 0,
            ..AccessConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_uppercase_role_key_rejected() {
        let mut config = AccessConfig::default();
        config
            .roles
            .insert("Supervisor".to_string(), RoleDefinition::default());
        assert!(config.validate().is_err());
    }
}
