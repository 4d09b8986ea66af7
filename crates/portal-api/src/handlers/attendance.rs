//! Check-in and attendance review handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::warn;
use uuid::Uuid;

use portal_entity::attendance::AttendanceEvent;
use portal_service::CheckIn;

use crate::dto::request::DecisionRequest;
use crate::dto::response::{ApiResponse, DecisionResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// POST /api/attendance/check-in
pub async fn check_in(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CheckIn>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceEvent>>), ApiError> {
    let event = state.attendance_service.check_in(&auth, &req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(event))))
}

/// POST /api/attendance/{id}/decision
pub async fn decide(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidJson(req): ValidJson<DecisionRequest>,
) -> Result<Json<ApiResponse<DecisionResponse<AttendanceEvent>>>, ApiError> {
    let reason = req.reason.as_deref();
    let event = state
        .attendance_service
        .decide(&auth, id, req.decision, reason)
        .await?;

    let (notification, notification_error) = match state
        .triggers
        .attendance_decision(&auth, &event, reason)
        .await
    {
        Ok(summary) => (Some(summary), None),
        Err(e) => {
            warn!(event_id = %id, error = %e, "Attendance decision saved but not notified");
            (None, Some(e.message))
        }
    };

    Ok(Json(ApiResponse::ok(DecisionResponse {
        record: event,
        notification,
        notification_error,
    })))
}
