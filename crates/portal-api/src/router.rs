//! Route definitions for the portal HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// JSON request bodies are small; templates are the largest.
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(access_routes())
        .merge(record_routes())
        .merge(decision_routes())
        .merge(notify_routes())
        .merge(site_routes())
        .merge(holiday_routes())
        .merge(template_routes())
        .merge(push_token_routes())
        .merge(delivery_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness, no auth
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Caller capability matrix
fn access_routes() -> Router<AppState> {
    Router::new().route(
        "/access/capabilities",
        get(handlers::access::capabilities),
    )
}

/// Scoped listings
fn record_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance", get(handlers::records::list_attendance))
        .route("/leave", get(handlers::records::list_leave))
        .route("/visits", get(handlers::records::list_visits))
        .route("/claims", get(handlers::records::list_claims))
        .route("/projects", get(handlers::records::list_projects))
}

/// Check-in and terminal decisions
fn decision_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance/check-in", post(handlers::attendance::check_in))
        .route(
            "/attendance/{id}/decision",
            post(handlers::attendance::decide),
        )
        .route("/leave/{id}/decision", post(handlers::leave::decide))
}

/// Business-event triggers
fn notify_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notify/leave-decision",
            post(handlers::notify::leave_decision),
        )
        .route(
            "/notify/attendance-decision",
            post(handlers::notify::attendance_decision),
        )
        .route("/notify/holiday", post(handlers::notify::holiday))
        .route("/notify/broadcast", post(handlers::notify::broadcast))
}

/// Geofence anchors
fn site_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sites",
            get(handlers::sites::list_sites).post(handlers::sites::create_site),
        )
        .route("/sites/{id}", put(handlers::sites::update_site))
}

/// Holidays
fn holiday_routes() -> Router<AppState> {
    Router::new().route(
        "/holidays",
        get(handlers::holidays::list_holidays).post(handlers::holidays::create_holiday),
    )
}

/// Template management
fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(handlers::templates::list_templates))
        .route(
            "/templates/{slug}",
            get(handlers::templates::get_template).put(handlers::templates::upsert_template),
        )
        .route(
            "/templates/{slug}/preview",
            post(handlers::templates::preview_template),
        )
}

/// Device tokens
fn push_token_routes() -> Router<AppState> {
    Router::new().route(
        "/push-tokens",
        post(handlers::push_tokens::register).delete(handlers::push_tokens::unregister),
    )
}

/// Delivery audit log
fn delivery_routes() -> Router<AppState> {
    Router::new().route("/deliveries", get(handlers::deliveries::list_deliveries))
}
