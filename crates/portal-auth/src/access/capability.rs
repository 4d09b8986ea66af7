//! Derives a capability matrix from an actor's role labels.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::error;

use portal_entity::access::{Actor, Capability, CapabilityMatrix, ResourceType};

use super::error::AccessError;
use super::policy::AccessPolicy;

/// Pure mapping from role labels and team relationship to capabilities.
///
/// Nothing is cached: every call reflects the actor's current roles.
#[derive(Debug, Clone)]
pub struct RoleCapabilityModel {
    policy: Arc<AccessPolicy>,
}

impl RoleCapabilityModel {
    /// Create a model over a validated policy.
    pub fn new(policy: Arc<AccessPolicy>) -> Self {
        Self { policy }
    }

    /// The underlying policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Capabilities for the actor, using its resolved subordinate list.
    ///
    /// An unmapped role is logged here once, with the actor attached.
    pub fn capabilities(&self, actor: &Actor) -> Result<CapabilityMatrix, AccessError> {
        self.derive(&actor.roles, actor.subordinate_count() > 0)
            .inspect_err(|e| {
                if let AccessError::UnmappedRole(role) = e {
                    error!(
                        uid = %actor.uid,
                        role = %role,
                        "Actor carries a role missing from the role table"
                    );
                }
            })
    }

    /// Capabilities for a role set plus the "supervises someone" flag.
    ///
    /// Any label missing from the role table is refused.
    pub fn derive(
        &self,
        roles: &[String],
        has_subordinates: bool,
    ) -> Result<CapabilityMatrix, AccessError> {
        let mut org_wide = BTreeSet::new();
        let mut supervisory = false;
        let mut actions = BTreeSet::new();

        for label in roles {
            let Some(grant) = self.policy.role(label) else {
                return Err(AccessError::UnmappedRole(label.clone()));
            };
            org_wide.extend(grant.org_wide.iter().copied());
            supervisory |= grant.supervisory;
            actions.extend(grant.actions.iter().copied());
        }

        let resources: BTreeMap<ResourceType, Capability> = ResourceType::ALL
            .into_iter()
            .map(|resource| {
                let view_all = org_wide.contains(&resource);
                let view_team = view_all || supervisory || has_subordinates;
                let approve = if resource.approval_requires_org_wide() {
                    view_all
                } else {
                    view_all || view_team
                };
                (
                    resource,
                    Capability {
                        view_all,
                        view_team,
                        view_self: true,
                        approve,
                    },
                )
            })
            .collect();

        Ok(CapabilityMatrix { resources, actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::config::AccessConfig;
    use portal_entity::access::SystemAction;

    fn model() -> RoleCapabilityModel {
        let policy = AccessPolicy::from_config(&AccessConfig::default()).unwrap();
        RoleCapabilityModel::new(Arc::new(policy))
    }

    fn roles(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_lowercase()).collect()
    }

    #[test]
    fn test_org_wide_roles_view_everything() {
        let model = model();
        for label in ["admin", "hr"] {
            let matrix = model.derive(&roles(&[label]), false).unwrap();
            for resource in ResourceType::ALL {
                let cap = matrix.for_resource(resource);
                assert!(cap.view_all, "{label} should view all {resource}");
                assert!(cap.approve);
            }
        }
    }

    #[test]
    fn test_accounts_is_org_wide_for_claims_only() {
        let matrix = model().derive(&roles(&["Accounts"]), false).unwrap();
        let claim = matrix.for_resource(ResourceType::Claim);
        assert!(claim.view_all);
        assert!(claim.approve);

        let leave = matrix.for_resource(ResourceType::Leave);
        assert!(!leave.view_all && !leave.view_team);
        assert!(!leave.approve);
    }

    #[test]
    fn test_supervisor_cannot_approve_claims() {
        let matrix = model().derive(&roles(&["supervisor"]), true).unwrap();
        for resource in [ResourceType::Attendance, ResourceType::Leave, ResourceType::Visit] {
            let cap = matrix.for_resource(resource);
            assert!(cap.view_team && cap.approve && !cap.view_all);
        }
        let claim = matrix.for_resource(ResourceType::Claim);
        assert!(claim.view_team);
        assert!(!claim.approve);
    }

    #[test]
    fn test_subordinates_alone_grant_team_view() {
        let matrix = model().derive(&roles(&["employee"]), true).unwrap();
        let cap = matrix.for_resource(ResourceType::Attendance);
        assert!(cap.view_team);
        assert!(!cap.view_all);
    }

    #[test]
    fn test_plain_employee_is_self_only() {
        let matrix = model().derive(&roles(&["employee"]), false).unwrap();
        for resource in ResourceType::ALL {
            let cap = matrix.for_resource(resource);
            assert!(cap.view_self);
            assert!(!cap.view_team && !cap.view_all && !cap.approve);
        }
        assert!(matrix.actions.is_empty());
    }

    #[test]
    fn test_no_roles_is_self_only() {
        let matrix = model().derive(&[], false).unwrap();
        assert!(matrix.for_resource(ResourceType::Project).view_self);
        assert!(!matrix.for_resource(ResourceType::Project).view_team);
    }

    #[test]
    fn test_unmapped_role_is_refused() {
        let err = model().derive(&roles(&["employee", "intern"]), false).unwrap_err();
        assert_eq!(err, AccessError::UnmappedRole("intern".to_string()));
    }

    #[test]
    fn test_actor_with_unmapped_role_is_refused_with_label() {
        let actor = Actor::new("uid-1", None, ["Employee", "Contractor"], Some(vec![]));
        let err = model().capabilities(&actor).unwrap_err();
        assert_eq!(err, AccessError::UnmappedRole("contractor".to_string()));
    }

    #[test]
    fn test_actions_are_unioned() {
        let matrix = model().derive(&roles(&["hr", "accounts"]), false).unwrap();
        assert!(matrix.allows(SystemAction::SendBroadcast));
        assert!(matrix.allows(SystemAction::ViewDeliveryLog));
    }

    #[test]
    fn test_actor_without_resolved_team_has_no_subordinates() {
        let actor = Actor::new("uid-1", None, ["employee"], None);
        let matrix = model().capabilities(&actor).unwrap();
        assert!(!matrix.for_resource(ResourceType::Leave).view_team);
    }
}
