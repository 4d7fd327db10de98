use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use barberbook_core::models::auth::{LoginRequest, LoginResponse};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    ApiState,
    handlers::json_or_default,
    middleware::{auth::extract_bearer_token, error_handling::AppError},
};

/// Admin login. `200 {success: true, token}` or `401 {success: false}`.
///
/// Anything other than the right password as a JSON string, including a
/// missing body or a `null` password, is an ordinary rejection.
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let payload: LoginRequest = json_or_default(payload);
    match state.admin.login(&payload.password).await? {
        Some(token) => {
            info!("Admin login succeeded");
            Ok((StatusCode::OK, Json(LoginResponse::accepted(token))))
        }
        None => {
            warn!("Admin login rejected");
            Ok((StatusCode::UNAUTHORIZED, Json(LoginResponse::rejected())))
        }
    }
}

/// Ends the presented admin session, if any.
#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> StatusCode {
    if let Some(token) = extract_bearer_token(&headers) {
        state.admin.logout(&token).await;
        info!("Admin logged out");
    }
    StatusCode::NO_CONTENT
}
