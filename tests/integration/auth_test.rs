//! Bearer credential rejection happens before any data access.

use axum::http::StatusCode;
use portal_auth::JwtEncoder;
use portal_core::config::AuthConfig;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_missing_bearer_is_unauthorized() {
    let app = TestApp::new();

    for uri in ["/api/access/capabilities", "/api/attendance", "/api/deliveries"] {
        let response = app.request("GET", uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(response.body["error"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_garbage_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/leave", None, Some("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = TestApp::new();
    let token = app.token("uid-expired", -10);

    let response = app
        .request("GET", "/api/access/capabilities", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Token has expired");
}

#[tokio::test]
async fn test_foreign_signature_is_unauthorized() {
    let app = TestApp::new();
    let foreign = AuthConfig {
        jwt_secret: "some-other-secret".to_string(),
        ..app.config.auth.clone()
    };
    let token = JwtEncoder::new(&foreign)
        .issue("uid-1", None, 10)
        .expect("sign");

    let response = app
        .request("GET", "/api/attendance", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_decision_without_bearer_is_rejected_before_body_validation() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/leave/00000000-0000-0000-0000-000000000001/decision",
            Some(serde_json::json!({ "decision": "maybe" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
