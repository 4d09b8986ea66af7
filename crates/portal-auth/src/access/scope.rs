//! Builds the narrowest listing predicate a capability matrix permits.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use portal_core::types::SortField;
use portal_entity::access::{Actor, CapabilityMatrix, ResourceType, ScopeLevel, ScopedQuery};

use super::policy::AccessPolicy;

/// Turns capabilities plus actor identity into a [`ScopedQuery`].
///
/// Every branch applies the same ordering (resource date column,
/// descending) and the same look-back window, so pagination behaves the
/// same regardless of the scope level.
#[derive(Debug, Clone)]
pub struct ScopedQueryBuilder {
    policy: Arc<AccessPolicy>,
}

impl ScopedQueryBuilder {
    /// Create a builder over a validated policy.
    pub fn new(policy: Arc<AccessPolicy>) -> Self {
        Self { policy }
    }

    /// Build the scope for `resource` as of now.
    pub fn build(
        &self,
        matrix: &CapabilityMatrix,
        actor: &Actor,
        resource: ResourceType,
    ) -> ScopedQuery {
        self.build_at(matrix, actor, resource, Utc::now())
    }

    /// Build the scope for `resource` with an explicit clock.
    pub fn build_at(
        &self,
        matrix: &CapabilityMatrix,
        actor: &Actor,
        resource: ResourceType,
        now: DateTime<Utc>,
    ) -> ScopedQuery {
        let cap = matrix.for_resource(resource);
        let since = self
            .policy
            .lookback_days(resource)
            .map(|days| now - Duration::days(i64::from(days)));
        let order = SortField::desc(resource.date_column());

        if cap.view_all {
            return ScopedQuery {
                resource,
                level: ScopeLevel::OrgWide,
                identities: None,
                since,
                order,
                truncated: false,
                narrowed: false,
            };
        }

        let mut narrowed = false;
        let (level, candidates) = match (&actor.subordinate_ids, cap.view_team) {
            (Some(subordinates), true) if !subordinates.is_empty() => {
                let mut ids = actor.self_aliases();
                ids.extend(subordinates.iter().cloned());
                (ScopeLevel::Team, ids)
            }
            (None, true) => {
                warn!(
                    actor = %actor.uid,
                    resource = %resource,
                    "Subordinate lookup failed; narrowing scope to self"
                );
                narrowed = true;
                (ScopeLevel::SelfOnly, actor.self_aliases())
            }
            _ => (ScopeLevel::SelfOnly, actor.self_aliases()),
        };

        let max = self.policy.max_scope_identities();
        let (identities, truncated) = cap_identities(candidates, max);
        if truncated {
            warn!(
                actor = %actor.uid,
                resource = %resource,
                limit = max,
                "Team exceeds the scope identity ceiling; extra members are not listed"
            );
        }

        ScopedQuery {
            resource,
            level,
            identities: Some(identities),
            since,
            order,
            truncated,
            narrowed,
        }
    }
}

/// Deduplicate preserving first occurrence, then keep at most `max`.
fn cap_identities(candidates: Vec<String>, max: usize) -> (Vec<String>, bool) {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = candidates
        .into_iter()
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect();
    let truncated = unique.len() > max;
    unique.truncate(max);
    (unique, truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::capability::RoleCapabilityModel;
    use portal_core::config::AccessConfig;
    use uuid::Uuid;

    fn policy() -> Arc<AccessPolicy> {
        Arc::new(AccessPolicy::from_config(&AccessConfig::default()).unwrap())
    }

    fn scope_for(actor: &Actor, resource: ResourceType, now: DateTime<Utc>) -> ScopedQuery {
        let policy = policy();
        let matrix = RoleCapabilityModel::new(policy.clone())
            .capabilities(actor)
            .unwrap();
        ScopedQueryBuilder::new(policy).build_at(&matrix, actor, resource, now)
    }

    fn subordinates(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("sub-{i}")).collect()
    }

    #[test]
    fn test_org_wide_is_unfiltered_but_time_bounded() {
        let now = Utc::now();
        let actor = Actor::new("uid-hr", None, ["HR"], Some(vec![]));
        let scope = scope_for(&actor, ResourceType::Attendance, now);
        assert_eq!(scope.level, ScopeLevel::OrgWide);
        assert_eq!(scope.identities, None);
        assert_eq!(scope.since, Some(now - Duration::days(30)));
        assert_eq!(scope.order, SortField::desc("checked_in_at"));
    }

    #[test]
    fn test_plain_employee_is_restricted_to_own_aliases() {
        let employee_id = Uuid::new_v4();
        let actor = Actor::new("uid-e", Some(employee_id), ["employee"], Some(vec![]));
        for resource in ResourceType::ALL {
            let scope = scope_for(&actor, resource, Utc::now());
            assert_eq!(scope.level, ScopeLevel::SelfOnly);
            assert_eq!(
                scope.identities,
                Some(vec!["uid-e".to_string(), employee_id.to_string()])
            );
            assert_eq!(scope.order.field, resource.date_column());
        }
    }

    #[test]
    fn test_supervisor_with_three_reports_sees_exactly_team() {
        let actor = Actor::new("uid-s", None, ["Supervisor"], Some(subordinates(3)));
        let scope = scope_for(&actor, ResourceType::Leave, Utc::now());
        assert_eq!(scope.level, ScopeLevel::Team);
        assert_eq!(
            scope.identities,
            Some(vec![
                "uid-s".to_string(),
                "sub-0".to_string(),
                "sub-1".to_string(),
                "sub-2".to_string(),
            ])
        );
        assert_eq!(scope.order, SortField::desc("created_at"));
        assert_eq!(scope.since, None);
        assert!(!scope.truncated);
    }

    #[test]
    fn test_large_team_is_capped_at_ceiling() {
        let employee_id = Uuid::new_v4();
        let team = subordinates(75);
        let actor = Actor::new("uid-m", Some(employee_id), ["manager"], Some(team.clone()));
        let scope = scope_for(&actor, ResourceType::Visit, Utc::now());
        assert_eq!(scope.identity_count(), 30);
        assert!(scope.truncated);
        let ids = scope.identities.unwrap();
        assert_eq!(ids[..2], ["uid-m".to_string(), employee_id.to_string()]);
        assert_eq!(ids[2..], team[..28]);
    }

    #[test]
    fn test_each_report_takes_one_slot() {
        let employee_id = Uuid::new_v4();
        let team: Vec<String> = (0..28).map(|_| Uuid::new_v4().to_string()).collect();
        let actor = Actor::new("uid-s", Some(employee_id), ["supervisor"], Some(team.clone()));
        let scope = scope_for(&actor, ResourceType::Leave, Utc::now());
        assert_eq!(scope.level, ScopeLevel::Team);
        assert!(!scope.truncated);
        let ids = scope.identities.unwrap();
        assert_eq!(ids.len(), 30);
        assert_eq!(ids[..2], ["uid-s".to_string(), employee_id.to_string()]);
        assert_eq!(ids[2..], team[..]);
    }

    #[test]
    fn test_self_aliases_survive_one_report_over_ceiling() {
        let employee_id = Uuid::new_v4();
        let team = subordinates(29);
        let actor = Actor::new("uid-s", Some(employee_id), ["supervisor"], Some(team.clone()));
        let scope = scope_for(&actor, ResourceType::Leave, Utc::now());
        assert!(scope.truncated);
        let ids = scope.identities.unwrap();
        assert!(ids.contains(&"uid-s".to_string()));
        assert!(ids.contains(&employee_id.to_string()));
        assert!(!ids.contains(&team[28]));
    }

    #[test]
    fn test_duplicate_aliases_are_collapsed() {
        let actor = Actor::new(
            "uid-s",
            None,
            ["supervisor"],
            Some(vec!["sub-0".into(), "uid-s".into(), "sub-0".into()]),
        );
        let scope = scope_for(&actor, ResourceType::Project, Utc::now());
        assert_eq!(
            scope.identities,
            Some(vec!["uid-s".to_string(), "sub-0".to_string()])
        );
    }

    #[test]
    fn test_supervisor_without_reports_falls_to_self() {
        let actor = Actor::new("uid-s", None, ["supervisor"], Some(vec![]));
        let scope = scope_for(&actor, ResourceType::Leave, Utc::now());
        assert_eq!(scope.level, ScopeLevel::SelfOnly);
        assert_eq!(scope.identities, Some(vec!["uid-s".to_string()]));
    }

    #[test]
    fn test_failed_team_lookup_narrows_to_self() {
        let actor = Actor::new("uid-s", None, ["supervisor"], None);
        let scope = scope_for(&actor, ResourceType::Attendance, Utc::now());
        assert_eq!(scope.level, ScopeLevel::SelfOnly);
        assert!(scope.narrowed);
        assert_eq!(scope.identities, Some(vec!["uid-s".to_string()]));
    }

    #[test]
    fn test_failed_lookup_never_widens_org_wide_actor() {
        let actor = Actor::new("uid-a", None, ["admin"], None);
        let scope = scope_for(&actor, ResourceType::Claim, Utc::now());
        assert_eq!(scope.level, ScopeLevel::OrgWide);
        assert!(!scope.narrowed);
    }

    #[test]
    fn test_time_bound_applies_on_every_branch() {
        let now = Utc::now();
        let team = Actor::new("uid-s", None, ["supervisor"], Some(subordinates(2)));
        let solo = Actor::new("uid-e", None, ["employee"], Some(vec![]));
        for actor in [&team, &solo] {
            let scope = scope_for(actor, ResourceType::Attendance, now);
            assert_eq!(scope.since, Some(now - Duration::days(30)));
        }
    }

    #[test]
    fn test_scope_admits_only_listed_subjects() {
        let now = Utc::now();
        let actor = Actor::new("uid-s", None, ["supervisor"], Some(subordinates(1)));
        let scope = scope_for(&actor, ResourceType::Attendance, now);
        assert!(scope.admits("sub-0", now));
        assert!(!scope.admits("stranger", now));
        assert!(!scope.admits("sub-0", now - Duration::days(31)));
    }
}
