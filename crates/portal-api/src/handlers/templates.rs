//! Template management handlers.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};

use portal_entity::template::NotificationTemplate;
use portal_notify::RenderedMessage;

use crate::dto::request::UpsertTemplateRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// GET /api/templates
pub async fn list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<NotificationTemplate>>>, ApiError> {
    let templates = state.template_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(templates)))
}

/// GET /api/templates/{slug}
pub async fn get_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<NotificationTemplate>>, ApiError> {
    let template = state.template_service.get(&auth, &slug).await?;
    Ok(Json(ApiResponse::ok(template)))
}

/// PUT /api/templates/{slug}
pub async fn upsert_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    ValidJson(req): ValidJson<UpsertTemplateRequest>,
) -> Result<Json<ApiResponse<NotificationTemplate>>, ApiError> {
    let template = state
        .template_service
        .upsert(&auth, &slug, &req.into())
        .await?;
    Ok(Json(ApiResponse::ok(template)))
}

/// POST /api/templates/{slug}/preview
pub async fn preview_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(slug): Path<String>,
    Json(variables): Json<BTreeMap<String, String>>,
) -> Result<Json<ApiResponse<RenderedMessage>>, ApiError> {
    let rendered = state
        .template_service
        .preview(&auth, &slug, variables)
        .await?;
    Ok(Json(ApiResponse::ok(rendered)))
}
