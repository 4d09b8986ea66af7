//! Action and approval checks for one actor.

use portal_entity::access::{Actor, CapabilityMatrix, ResourceType, SystemAction};

use super::error::AccessError;

/// Checks an actor's requests against its capability matrix.
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard<'a> {
    actor: &'a Actor,
    matrix: &'a CapabilityMatrix,
}

impl<'a> AccessGuard<'a> {
    /// Guard for one actor and its freshly derived matrix.
    pub fn new(actor: &'a Actor, matrix: &'a CapabilityMatrix) -> Self {
        Self { actor, matrix }
    }

    /// Require a system action.
    pub fn require_action(&self, action: SystemAction) -> Result<(), AccessError> {
        if self.matrix.allows(action) {
            Ok(())
        } else {
            Err(AccessError::ActionDenied(action))
        }
    }

    /// Whether the actor may read a record owned by `subject`.
    pub fn can_view(&self, resource: ResourceType, subject: &str) -> bool {
        let cap = self.matrix.for_resource(resource);
        cap.view_all
            || self.is_self(subject)
            || (cap.view_team && self.is_subordinate(subject))
    }

    /// Require the right to decide a record owned by `subject`.
    ///
    /// Org-wide approvers may decide any record. Team approvers may decide
    /// records of their direct reports only, never their own.
    pub fn require_approval(
        &self,
        resource: ResourceType,
        subject: &str,
    ) -> Result<(), AccessError> {
        let cap = self.matrix.for_resource(resource);
        if !cap.approve {
            return Err(AccessError::ApprovalDenied(resource));
        }
        if cap.view_all || self.is_subordinate(subject) {
            Ok(())
        } else {
            Err(AccessError::OutOfScope(resource))
        }
    }

    fn is_self(&self, subject: &str) -> bool {
        self.actor.self_aliases().iter().any(|a| a == subject)
    }

    fn is_subordinate(&self, subject: &str) -> bool {
        self.actor
            .subordinate_ids
            .as_ref()
            .is_some_and(|ids| ids.iter().any(|id| id == subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::access::capability::RoleCapabilityModel;
    use crate::access::policy::AccessPolicy;
    use portal_core::config::AccessConfig;

    fn matrix_for(actor: &Actor) -> CapabilityMatrix {
        let policy = AccessPolicy::from_config(&AccessConfig::default()).unwrap();
        RoleCapabilityModel::new(Arc::new(policy))
            .capabilities(actor)
            .unwrap()
    }

    #[test]
    fn test_supervisor_approves_team_leave_but_not_own() {
        let actor = Actor::new("uid-s", None, ["supervisor"], Some(vec!["uid-e".into()]));
        let matrix = matrix_for(&actor);
        let guard = AccessGuard::new(&actor, &matrix);
        assert!(guard.require_approval(ResourceType::Leave, "uid-e").is_ok());
        assert_eq!(
            guard.require_approval(ResourceType::Leave, "uid-s"),
            Err(AccessError::OutOfScope(ResourceType::Leave))
        );
        assert_eq!(
            guard.require_approval(ResourceType::Leave, "uid-x"),
            Err(AccessError::OutOfScope(ResourceType::Leave))
        );
    }

    #[test]
    fn test_supervisor_cannot_approve_team_claim() {
        let actor = Actor::new("uid-s", None, ["manager"], Some(vec!["uid-e".into()]));
        let matrix = matrix_for(&actor);
        let guard = AccessGuard::new(&actor, &matrix);
        assert_eq!(
            guard.require_approval(ResourceType::Claim, "uid-e"),
            Err(AccessError::ApprovalDenied(ResourceType::Claim))
        );
        assert!(guard.can_view(ResourceType::Claim, "uid-e"));
    }

    #[test]
    fn test_accounts_approves_any_claim() {
        let actor = Actor::new("uid-acc", None, ["accounts"], Some(vec![]));
        let matrix = matrix_for(&actor);
        let guard = AccessGuard::new(&actor, &matrix);
        assert!(guard.require_approval(ResourceType::Claim, "anyone").is_ok());
    }

    #[test]
    fn test_employee_lacks_broadcast_action() {
        let actor = Actor::new("uid-e", None, ["employee"], Some(vec![]));
        let matrix = matrix_for(&actor);
        let guard = AccessGuard::new(&actor, &matrix);
        assert_eq!(
            guard.require_action(SystemAction::SendBroadcast),
            Err(AccessError::ActionDenied(SystemAction::SendBroadcast))
        );
        assert!(guard.can_view(ResourceType::Visit, "uid-e"));
        assert!(!guard.can_view(ResourceType::Visit, "uid-other"));
    }
}
