//! Geofence anchor handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use portal_entity::site::Site;

use crate::dto::request::{CreateSiteRequest, UpdateSiteRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// GET /api/sites
pub async fn list_sites(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Site>>>, ApiError> {
    let sites = state.site_service.list().await?;
    Ok(Json(ApiResponse::ok(sites)))
}

/// POST /api/sites
pub async fn create_site(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateSiteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Site>>), ApiError> {
    let site = state.site_service.create(&auth, &req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(site))))
}

/// PUT /api/sites/{id}
pub async fn update_site(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateSiteRequest>,
) -> Result<Json<ApiResponse<Site>>, ApiError> {
    let site = state.site_service.update(&auth, id, &req.into()).await?;
    Ok(Json(ApiResponse::ok(site)))
}
