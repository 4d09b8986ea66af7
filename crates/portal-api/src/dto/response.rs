//! Response DTOs.

use serde::{Deserialize, Serialize};

use portal_entity::access::{Capability, ResourceType, ScopeLevel, SystemAction};
use portal_notify::DispatchSummary;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Database reachability.
    pub database: String,
}

/// A decided record and the outcome of its notification.
///
/// The decision is committed even when the notification could not be set
/// up; `notification_error` then says why and the notify endpoint can be
/// used to re-send.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResponse<T: Serialize> {
    /// The decided record.
    pub record: T,
    /// Dispatch outcome, if the dispatch ran.
    pub notification: Option<DispatchSummary>,
    /// Why the dispatch did not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

/// One resource row of the caller's capability matrix.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceCapability {
    /// Resource type.
    pub resource: ResourceType,
    /// Effective scope level.
    pub scope: ScopeLevel,
    /// Raw capability flags.
    #[serde(flatten)]
    pub capability: Capability,
}

/// The caller's identity and capabilities.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitiesResponse {
    /// Auth uid.
    pub uid: String,
    /// Normalized role labels.
    pub roles: Vec<String>,
    /// Whether the team lookup succeeded.
    pub team_resolved: bool,
    /// Per-resource capabilities.
    pub resources: Vec<ResourceCapability>,
    /// Granted system actions.
    pub actions: Vec<SystemAction>,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}
