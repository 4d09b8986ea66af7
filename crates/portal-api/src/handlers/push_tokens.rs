//! Device token registration handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::PushTokenRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/push-tokens
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<PushTokenRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.push_service.register(&auth, &req.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Token registered".to_string(),
    })))
}

/// DELETE /api/push-tokens
pub async fn unregister(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<PushTokenRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.push_service.unregister(&auth, &req.token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Token removed".to_string(),
    })))
}
