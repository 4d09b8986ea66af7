//! Resolves a verified identity into an [`Actor`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use portal_auth::Claims;
use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::EmployeeRepository;
use portal_entity::access::Actor;
use portal_entity::employee::Employee;

/// Organizational lookups needed to build an actor.
#[async_trait]
pub trait ActorDirectory: Send + Sync + 'static {
    /// The employee record linked to an auth uid.
    async fn employee_by_uid(&self, uid: &str) -> AppResult<Option<Employee>>;

    /// Employee ids of the employee's active direct reports.
    async fn subordinate_ids(&self, employee_id: Uuid) -> AppResult<Vec<String>>;
}

#[async_trait]
impl ActorDirectory for EmployeeRepository {
    async fn employee_by_uid(&self, uid: &str) -> AppResult<Option<Employee>> {
        self.find_by_auth_uid(uid).await
    }

    async fn subordinate_ids(&self, employee_id: Uuid) -> AppResult<Vec<String>> {
        EmployeeRepository::subordinate_ids(self, employee_id).await
    }
}

/// The subordinate list could not be resolved.
///
/// Never surfaced to callers: the actor is narrowed to self-only scope.
#[derive(Debug, Error)]
#[error("subordinate lookup failed for {uid}: {source}")]
pub struct ScopeResolutionError {
    /// Actor whose team is unknown.
    pub uid: String,
    /// Lookup failure.
    #[source]
    pub source: AppError,
}

/// Builds actors from verified claims plus directory lookups.
#[derive(Clone)]
pub struct ActorResolver {
    directory: Arc<dyn ActorDirectory>,
}

impl std::fmt::Debug for ActorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorResolver").finish_non_exhaustive()
    }
}

impl ActorResolver {
    /// Creates a resolver over the employee directory.
    pub fn new(directory: Arc<dyn ActorDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve the actor for verified claims.
    ///
    /// An identity with no employee record gets no roles and an empty team.
    /// A failed subordinate lookup leaves the team unresolved.
    pub async fn resolve(&self, claims: &Claims) -> AppResult<Actor> {
        let Some(employee) = self.directory.employee_by_uid(&claims.sub).await? else {
            debug!(uid = %claims.sub, "No employee record for identity");
            return Ok(Actor::new(&claims.sub, None, Vec::<String>::new(), Some(Vec::new()))
                .with_email(claims.email.clone()));
        };

        if !employee.is_active() {
            return Err(AppError::forbidden("Employee account is not active"));
        }

        let subordinates = match self.directory.subordinate_ids(employee.id).await {
            Ok(ids) => Some(ids),
            Err(source) => {
                let err = ScopeResolutionError {
                    uid: claims.sub.clone(),
                    source,
                };
                warn!(error = %err, "Team unresolved; scope will be narrowed to self");
                None
            }
        };

        Ok(
            Actor::new(&claims.sub, Some(employee.id), &employee.roles, subordinates)
                .with_email(claims.email.clone().or(employee.email.clone()))
                .with_name(employee.full_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use portal_auth::{AccessPolicy, RoleCapabilityModel, ScopedQueryBuilder};
    use portal_core::config::AccessConfig;
    use portal_entity::access::{ResourceType, ScopeLevel};
    use portal_entity::employee::EmployeeStatus;

    struct FakeDirectory {
        employee: Option<Employee>,
        subordinates: Option<Vec<String>>,
    }

    #[async_trait]
    impl ActorDirectory for FakeDirectory {
        async fn employee_by_uid(&self, _uid: &str) -> AppResult<Option<Employee>> {
            Ok(self.employee.clone())
        }

        async fn subordinate_ids(&self, _employee_id: Uuid) -> AppResult<Vec<String>> {
            self.subordinates
                .clone()
                .ok_or_else(|| AppError::database("connection reset"))
        }
    }

    fn employee(roles: &[&str], status: EmployeeStatus) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            auth_uid: "uid-asha".to_string(),
            full_name: "Asha Rao".to_string(),
            email: Some("asha@example.com".to_string()),
            phone: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            supervisor_id: None,
            status,
            push_tokens: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report_ids(n: usize) -> Vec<String> {
        (0..n).map(|_| Uuid::new_v4().to_string()).collect()
    }

    fn claims() -> Claims {
        Claims {
            sub: "uid-asha".to_string(),
            email: None,
            iss: None,
            iat: 0,
            exp: 0,
        }
    }

    #[tokio::test]
    async fn test_resolves_roles_and_team() {
        let resolver = ActorResolver::new(Arc::new(FakeDirectory {
            employee: Some(employee(&["Supervisor"], EmployeeStatus::Active)),
            subordinates: Some(report_ids(2)),
        }));
        let actor = resolver.resolve(&claims()).await.unwrap();
        assert!(actor.has_role("supervisor"));
        assert_eq!(actor.subordinate_count(), 2);
        assert_eq!(actor.email.as_deref(), Some("asha@example.com"));
        assert_eq!(actor.display_name(), "Asha Rao");
    }

    #[tokio::test]
    async fn test_failed_team_lookup_leaves_team_unresolved() {
        let resolver = ActorResolver::new(Arc::new(FakeDirectory {
            employee: Some(employee(&["Supervisor"], EmployeeStatus::Active)),
            subordinates: None,
        }));
        let actor = resolver.resolve(&claims()).await.unwrap();
        assert!(!actor.team_resolved());
    }

    #[tokio::test]
    async fn test_unknown_identity_has_no_roles() {
        let resolver = ActorResolver::new(Arc::new(FakeDirectory {
            employee: None,
            subordinates: None,
        }));
        let actor = resolver.resolve(&claims()).await.unwrap();
        assert!(actor.roles.is_empty());
        assert!(actor.employee_id.is_none());
        assert!(actor.team_resolved());
    }

    #[tokio::test]
    async fn test_inactive_employee_rejected() {
        let resolver = ActorResolver::new(Arc::new(FakeDirectory {
            employee: Some(employee(&["employee"], EmployeeStatus::Inactive)),
            subordinates: Some(Vec::new()),
        }));
        assert!(resolver.resolve(&claims()).await.is_err());
    }

    #[tokio::test]
    async fn test_resolved_team_of_twenty_fits_under_ceiling() {
        let reports = report_ids(20);
        let supervisor = employee(&["Supervisor"], EmployeeStatus::Active);
        let supervisor_id = supervisor.id;
        let resolver = ActorResolver::new(Arc::new(FakeDirectory {
            employee: Some(supervisor),
            subordinates: Some(reports.clone()),
        }));
        let actor = resolver.resolve(&claims()).await.unwrap();

        let policy = Arc::new(AccessPolicy::from_config(&AccessConfig::default()).unwrap());
        let matrix = RoleCapabilityModel::new(policy.clone())
            .capabilities(&actor)
            .unwrap();
        let scope = ScopedQueryBuilder::new(policy).build(&matrix, &actor, ResourceType::Leave);

        assert_eq!(scope.level, ScopeLevel::Team);
        assert!(!scope.truncated);
        let ids = scope.identities.unwrap();
        assert_eq!(ids.len(), 2 + reports.len());
        assert_eq!(ids[0], "uid-asha");
        assert_eq!(ids[1], supervisor_id.to_string());
        assert!(reports.iter().all(|r| ids.contains(r)));
    }
}
