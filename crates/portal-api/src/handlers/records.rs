//! Scoped listings of role-guarded resources.

use axum::Json;
use axum::extract::{Query, State};

use portal_entity::access::ResourceType;
use portal_service::ScopedPage;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

type ListResult = Result<Json<ApiResponse<ScopedPage>>, ApiError>;

async fn list(
    state: &AppState,
    auth: &AuthUser,
    params: &PaginationParams,
    resource: ResourceType,
) -> ListResult {
    let page = state
        .record_service
        .list(auth, resource, &params.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/attendance
pub async fn list_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ListResult {
    list(&state, &auth, &params, ResourceType::Attendance).await
}

/// GET /api/leave
pub async fn list_leave(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ListResult {
    list(&state, &auth, &params, ResourceType::Leave).await
}

/// GET /api/visits
pub async fn list_visits(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ListResult {
    list(&state, &auth, &params, ResourceType::Visit).await
}

/// GET /api/claims
pub async fn list_claims(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ListResult {
    list(&state, &auth, &params, ResourceType::Claim).await
}

/// GET /api/projects
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> ListResult {
    list(&state, &auth, &params, ResourceType::Project).await
}
