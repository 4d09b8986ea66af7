//! The validated role table.

use std::collections::{BTreeMap, BTreeSet};

use portal_core::config::AccessConfig;
use portal_core::error::AppError;
use portal_entity::access::{ResourceType, SystemAction, normalize_role};

/// The effect of one role label, with names resolved to catalogue types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleGrant {
    /// Resources this role may view organisation-wide.
    pub org_wide: BTreeSet<ResourceType>,
    /// Whether the label marks a supervisor.
    pub supervisory: bool,
    /// Granted system actions.
    pub actions: BTreeSet<SystemAction>,
}

/// Role table, look-back windows and the scope identity ceiling.
///
/// Built once at startup from [`AccessConfig`]; construction fails on
/// any resource or action name outside the catalogues.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    roles: BTreeMap<String, RoleGrant>,
    lookback_days: BTreeMap<ResourceType, u32>,
    max_scope_identities: usize,
}

impl AccessPolicy {
    /// Resolve and validate the configured role table.
    pub fn from_config(config: &AccessConfig) -> Result<Self, AppError> {
        config.validate()?;

        let mut roles = BTreeMap::new();
        for (name, def) in &config.roles {
            let org_wide = def
                .org_wide
                .iter()
                .map(|r| {
                    r.parse::<ResourceType>().map_err(|_| {
                        AppError::configuration(format!(
                            "access.roles.{name}: unknown resource '{r}'"
                        ))
                    })
                })
                .collect::<Result<BTreeSet<_>, _>>()?;

            let actions = def
                .actions
                .iter()
                .map(|a| {
                    a.parse::<SystemAction>().map_err(|_| {
                        AppError::configuration(format!(
                            "access.roles.{name}: unknown action '{a}'"
                        ))
                    })
                })
                .collect::<Result<BTreeSet<_>, _>>()?;

            roles.insert(
                normalize_role(name),
                RoleGrant {
                    org_wide,
                    supervisory: def.supervisory,
                    actions,
                },
            );
        }

        let lookback_days = config
            .lookback_days
            .iter()
            .map(|(resource, days)| {
                resource
                    .parse::<ResourceType>()
                    .map(|r| (r, *days))
                    .map_err(|_| {
                        AppError::configuration(format!(
                            "access.lookback_days: unknown resource '{resource}'"
                        ))
                    })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        tracing::info!(
            roles = roles.len(),
            max_scope_identities = config.max_scope_identities,
            "Access policy loaded"
        );

        Ok(Self {
            roles,
            lookback_days,
            max_scope_identities: config.max_scope_identities,
        })
    }

    /// Grant for a role label, if the table lists it.
    pub fn role(&self, label: &str) -> Option<&RoleGrant> {
        self.roles.get(&normalize_role(label))
    }

    /// All recognised labels.
    pub fn role_names(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    /// Look-back window for a resource, if bounded.
    pub fn lookback_days(&self, resource: ResourceType) -> Option<u32> {
        self.lookback_days.get(&resource).copied()
    }

    /// Maximum identities in one scoped predicate.
    pub fn max_scope_identities(&self) -> usize {
        self.max_scope_identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::config::RoleDefinition;

    #[test]
    fn test_default_table_resolves() {
        let policy = AccessPolicy::from_config(&AccessConfig::default()).unwrap();
        let accounts = policy.role("Accounts").unwrap();
        assert_eq!(accounts.org_wide, BTreeSet::from([ResourceType::Claim]));
        assert!(policy.role("DemoManager").unwrap().supervisory);
        assert_eq!(policy.lookback_days(ResourceType::Attendance), Some(30));
        assert_eq!(policy.lookback_days(ResourceType::Leave), None);
        assert_eq!(policy.max_scope_identities(), 30);
    }

    #[test]
    fn test_unknown_resource_fails_loudly() {
        let mut config = AccessConfig::default();
        config.roles.insert(
            "payroll".to_string(),
            RoleDefinition {
                org_wide: vec!["payslip".to_string()],
                ..RoleDefinition::default()
            },
        );
        let err = AccessPolicy::from_config(&config).unwrap_err();
        assert!(err.message.contains("unknown resource 'payslip'"));
    }

    #[test]
    fn test_unknown_action_fails_loudly() {
        let mut config = AccessConfig::default();
        config.roles.insert(
            "ops".to_string(),
            RoleDefinition {
                actions: vec!["launch_rockets".to_string()],
                ..RoleDefinition::default()
            },
        );
        assert!(AccessPolicy::from_config(&config).is_err());
    }

    #[test]
    fn test_unknown_lookback_resource_fails() {
        let mut config = AccessConfig::default();
        config.lookback_days.insert("inventory".to_string(), 7);
        assert!(AccessPolicy::from_config(&config).is_err());
    }
}
