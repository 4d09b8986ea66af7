//! Delivery log handler.

use axum::Json;
use axum::extract::{Query, State};

use portal_core::types::pagination::PageResponse;
use portal_entity::delivery::DeliveryRecord;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/deliveries
pub async fn list_deliveries(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<DeliveryRecord>>>, ApiError> {
    let page = state
        .triggers
        .deliveries(&auth, params.event.as_deref(), &params.page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}
