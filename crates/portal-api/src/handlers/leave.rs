//! Leave review handler.

use axum::Json;
use axum::extract::{Path, State};
use tracing::warn;
use uuid::Uuid;

use portal_entity::leave::LeaveApplication;

use crate::dto::request::DecisionRequest;
use crate::dto::response::{ApiResponse, DecisionResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/leave/{id}/decision
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<DecisionRequest>,
) -> Result<Json<ApiResponse<DecisionResponse<LeaveApplication>>>, ApiError> {
    let reason = req.reason.as_deref();
    let application = state
        .leave_service
        .decide(&auth, id, req.decision, reason)
        .await?;

    let (notification, notification_error) = match state
        .triggers
        .leave_decision(&auth, &application, reason)
        .await
    {
        Ok(summary) => (Some(summary), None),
        Err(e) => {
            warn!(leave_id = %id, error = %e, "Leave decision saved but not notified");
            (None, Some(e.message))
        }
    };

    Ok(Json(ApiResponse::ok(DecisionResponse {
        record: application,
        notification,
        notification_error,
    })))
}
