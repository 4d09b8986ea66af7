//! Business-event notification triggers.

use axum::Json;
use axum::extract::State;

use portal_notify::DispatchSummary;
use portal_service::BroadcastRequest;

use crate::dto::request::{AnnounceHolidayRequest, ResendDecisionRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

type DispatchResult = Result<Json<ApiResponse<DispatchSummary>>, ApiError>;

/// POST /api/notify/leave-decision
pub async fn leave_decision(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ResendDecisionRequest>,
) -> DispatchResult {
    let summary = state
        .triggers
        .resend_leave_decision(&auth, req.id, req.reason.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/notify/attendance-decision
pub async fn attendance_decision(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ResendDecisionRequest>,
) -> DispatchResult {
    let summary = state
        .triggers
        .resend_attendance_decision(&auth, req.id, req.reason.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/notify/holiday
pub async fn holiday(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<AnnounceHolidayRequest>,
) -> DispatchResult {
    let summary = state.triggers.holiday(&auth, req.holiday_id).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// POST /api/notify/broadcast
pub async fn broadcast(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<BroadcastRequest>,
) -> DispatchResult {
    let summary = state.triggers.broadcast(&auth, req).await?;
    Ok(Json(ApiResponse::ok(summary)))
}
