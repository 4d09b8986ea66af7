//! Capability introspection.

use axum::Json;

use portal_entity::access::ResourceType;

use crate::dto::response::{ApiResponse, CapabilitiesResponse, ResourceCapability};
use crate::extractors::AuthUser;

/// GET /api/access/capabilities
pub async fn capabilities(auth: AuthUser) -> Json<ApiResponse<CapabilitiesResponse>> {
    let resources = ResourceType::ALL
        .iter()
        .map(|&resource| {
            let capability = auth.capabilities.for_resource(resource);
            ResourceCapability {
                resource,
                scope: capability.scope_level(),
                capability,
            }
        })
        .collect();

    Json(ApiResponse::ok(CapabilitiesResponse {
        uid: auth.actor.uid.clone(),
        roles: auth.actor.roles.clone(),
        team_resolved: auth.actor.team_resolved(),
        resources,
        actions: auth.capabilities.actions.iter().copied().collect(),
    }))
}
