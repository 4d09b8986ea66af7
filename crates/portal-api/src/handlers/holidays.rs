//! Holiday handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::Utc;

use portal_entity::holiday::Holiday;

use crate::dto::request::{CreateHolidayRequest, HolidayQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidJson};
use crate::state::AppState;

/// GET /api/holidays
pub async fn list_holidays(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<HolidayQuery>,
) -> Result<Json<ApiResponse<Vec<Holiday>>>, ApiError> {
    let from = query.from.unwrap_or_else(|| Utc::now().date_naive());
    let holidays = state.holiday_service.list_from(from).await?;
    Ok(Json(ApiResponse::ok(holidays)))
}

/// POST /api/holidays
pub async fn create_holiday(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<CreateHolidayRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Holiday>>), ApiError> {
    let holiday = state.holiday_service.create(&auth, &req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(holiday))))
}
