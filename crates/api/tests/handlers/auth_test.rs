use axum::http::{HeaderName, HeaderValue, StatusCode};
use barberbook_api::{config::AdminConfig, notifier::Notifier};
use barberbook_core::models::auth::LoginResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::test_utils::{SLOT_ID, TestContext, admin_config, admin_hash};

fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

async fn login_token(ctx: &TestContext) -> String {
    let response = ctx
        .server
        .post("/api/login")
        .json(&json!({ "password": "admin" }))
        .await;
    response.assert_status_ok();
    response
        .json::<LoginResponse>()
        .token
        .expect("successful login returns a token")
}

#[tokio::test]
async fn test_login_success() {
    let ctx = TestContext::new();

    let response = ctx
        .server
        .post("/api/login")
        .json(&json!({ "password": "admin" }))
        .await;

    response.assert_status_ok();
    let body: LoginResponse = response.json();
    assert!(body.success);
    assert_eq!(body.message, "Login successful");
    assert!(body.token.is_some());
}

#[rstest]
#[case(json!({ "password": "wrong" }))]
#[case(json!({ "password": "Admin" }))]
#[case(json!({ "password": "admin " }))]
#[case(json!({ "password": "" }))]
#[case(json!({}))]
#[case(json!({ "password": null }))]
#[case(json!({ "password": 123 }))]
#[case(json!({ "password": ["admin"] }))]
#[case(json!("admin"))]
#[tokio::test]
async fn test_login_rejected(#[case] body: serde_json::Value) {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/login").json(&body).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "success": false, "message": "Incorrect password" }));
}

#[tokio::test]
async fn test_login_without_json_body_rejected() {
    let ctx = TestContext::new();

    let response = ctx.server.post("/api/login").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "success": false, "message": "Incorrect password" }));

    let response = ctx.server.post("/api/login").text("admin").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "success": false, "message": "Incorrect password" }));
}

#[tokio::test]
async fn test_plain_password_is_hashed_at_startup() {
    let admin = AdminConfig {
        password: "s3cret".to_string(),
        password_hash: None,
        ..AdminConfig::default()
    };
    let ctx = TestContext::with_options(Notifier::disabled(), admin);

    ctx.server
        .post("/api/login")
        .json(&json!({ "password": "s3cret" }))
        .await
        .assert_status_ok();
    ctx.server
        .post("/api/login")
        .json(&json!({ "password": "admin" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_toggle_open_when_sessions_not_required() {
    let ctx = TestContext::new();

    ctx.server
        .post(&format!("/api/appointments/{}/toggle", SLOT_ID))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_toggle_requires_session_when_enforced() {
    let ctx = TestContext::with_options(Notifier::disabled(), admin_config(true));
    let toggle_path = format!("/api/appointments/{}/toggle", SLOT_ID);

    let response = ctx.server.post(&toggle_path).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Admin session required." }));

    let (name, value) = bearer("not-a-session");
    ctx.server
        .post(&toggle_path)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let token = login_token(&ctx).await;
    let (name, value) = bearer(&token);
    ctx.server
        .post(&toggle_path)
        .add_header(name, value)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_logout_ends_session() {
    let ctx = TestContext::with_options(Notifier::disabled(), admin_config(true));
    let toggle_path = format!("/api/appointments/{}/toggle", SLOT_ID);
    let token = login_token(&ctx).await;

    let (name, value) = bearer(&token);
    ctx.server
        .post("/api/logout")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let (name, value) = bearer(&token);
    ctx.server
        .post(&toggle_path)
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_session_rejected() {
    let admin = AdminConfig {
        password_hash: Some(admin_hash()),
        session_ttl_minutes: 0,
        require_session: true,
        ..AdminConfig::default()
    };
    let ctx = TestContext::with_options(Notifier::disabled(), admin);
    let token = login_token(&ctx).await;

    let (name, value) = bearer(&token);
    ctx.server
        .post(&format!("/api/appointments/{}/toggle", SLOT_ID))
        .add_header(name, value)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
