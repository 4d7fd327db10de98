use axum::{
    body::to_bytes,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
};
use std::sync::Arc;

use barberbook_api::middleware::{
    auth::{AdminGate, extract_bearer_token, hash_password, verify_password},
    error_handling::map_error,
};
use barberbook_core::errors::BookingError;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::Value;

use crate::test_utils::admin_config;

#[rstest]
#[case(BookingError::missing_customer_fields(), StatusCode::BAD_REQUEST)]
#[case(BookingError::slot_not_found(), StatusCode::NOT_FOUND)]
#[case(BookingError::slot_unavailable(), StatusCode::CONFLICT)]
#[case(BookingError::Authentication("no".into()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::Notification("sink down".into()), StatusCode::BAD_GATEWAY)]
#[case(BookingError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(
    BookingError::Internal(Box::new(std::io::Error::new(std::io::ErrorKind::Other, "boom"))),
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), expected);
}

#[tokio::test]
async fn test_error_body_carries_message() {
    let response = map_error(BookingError::slot_unavailable());

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body, serde_json::json!({ "error": "Appointment is not available." }));
}

#[tokio::test]
async fn test_password_hashing() {
    let password = "test_password";

    let hash = hash_password(password).expect("Failed to hash password");

    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, password).unwrap());
    assert!(!verify_password(&hash, "wrong_password").unwrap());
}

#[tokio::test]
async fn test_verify_rejects_malformed_hash() {
    assert!(verify_password("not-a-phc-string", "admin").is_err());
}

#[rstest]
#[case("Bearer abc-123", Some("abc-123"))]
#[case("Bearer   padded  ", Some("padded"))]
#[case("Bearer ", None)]
#[case("Basic YWRtaW46YWRtaW4=", None)]
#[case("abc-123", None)]
fn test_extract_bearer_token(#[case] header: &str, #[case] expected: Option<&str>) {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(header).unwrap());

    assert_eq!(extract_bearer_token(&headers).as_deref(), expected);
}

#[test]
fn test_extract_bearer_token_without_header() {
    assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_logins() {
    let gate = Arc::new(AdminGate::new(&admin_config(true)).unwrap());

    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let gate = gate.clone();
            let password = if i % 2 == 0 { "admin" } else { "wrong" };
            tokio::spawn(async move { gate.login(password).await })
        })
        .collect();

    let mut tokens = Vec::new();
    for (i, attempt) in attempts.into_iter().enumerate() {
        let token = attempt.await.unwrap().unwrap();
        assert_eq!(token.is_some(), i % 2 == 0);
        tokens.extend(token);
    }

    for token in &tokens {
        assert!(gate.validate(token).await);
    }
}
