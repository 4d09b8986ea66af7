//! Request context carrying the resolved actor and its capability matrix.

use chrono::{DateTime, Utc};
use serde::Serialize;

use portal_auth::AccessGuard;
use portal_entity::access::{Actor, CapabilityMatrix};

/// Context for the current authenticated request.
///
/// Built once per request by the API extractor and passed into service
/// methods, so every operation knows who is acting and what they may do.
/// The matrix is derived fresh for each request and never cached.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The acting identity.
    pub actor: Actor,
    /// Capabilities derived from the actor's roles and team.
    pub capabilities: CapabilityMatrix,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(actor: Actor, capabilities: CapabilityMatrix) -> Self {
        Self {
            actor,
            capabilities,
            request_time: Utc::now(),
        }
    }

    /// Action and approval checks for this actor.
    pub fn guard(&self) -> AccessGuard<'_> {
        AccessGuard::new(&self.actor, &self.capabilities)
    }

    /// Auth uid of the actor.
    pub fn uid(&self) -> &str {
        &self.actor.uid
    }

    /// Alias new records are filed under: the employee id when linked,
    /// otherwise the auth uid.
    pub fn subject_ref(&self) -> String {
        self.actor
            .employee_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| self.actor.uid.clone())
    }
}
