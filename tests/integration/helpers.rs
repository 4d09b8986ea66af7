//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use portal_api::AppState;
use portal_auth::JwtEncoder;
use portal_core::config::AppConfig;
use portal_database::connection::DatabasePool;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

/// Response captured from the router
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when empty or not JSON)
    pub body: Value,
}

impl TestApp {
    /// Build the full application over a lazy pool.
    pub fn new() -> Self {
        let config = AppConfig::load_from("tests/fixtures/test_config.toml")
            .expect("Failed to load test config");
        let pool = DatabasePool::connect_lazy(&config.database)
            .expect("Failed to build lazy pool")
            .into_pool();
        let state = AppState::build(config.clone(), pool).expect("Failed to build state");

        Self {
            router: portal_api::build_app(state),
            config,
        }
    }

    /// Sign a token with the configured secret.
    pub fn token(&self, uid: &str, ttl_minutes: i64) -> String {
        JwtEncoder::new(&self.config.auth)
            .issue(uid, None, ttl_minutes)
            .expect("Failed to sign token")
    }

    /// Send a request and capture status and JSON body.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
