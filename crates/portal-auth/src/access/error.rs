//! Access-control failures.

use thiserror::Error;

use portal_core::AppError;
use portal_entity::access::{ResourceType, SystemAction};

/// Why an actor was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The actor carries a role label the role table does not list.
    #[error("Role '{0}' is not mapped in the access policy")]
    UnmappedRole(String),
    /// The actor's roles do not grant a system action.
    #[error("Action '{0}' is not permitted")]
    ActionDenied(SystemAction),
    /// The actor may not approve records of this resource.
    #[error("Approving {0} records is not permitted")]
    ApprovalDenied(ResourceType),
    /// The record belongs to someone outside the actor's team.
    #[error("The {0} record is outside your scope")]
    OutOfScope(ResourceType),
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        AppError::forbidden(err.to_string())
    }
}
