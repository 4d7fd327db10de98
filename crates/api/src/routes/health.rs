use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize, Deserialize)]
pub struct BannerResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize)]
pub struct VersionResponse {
    pub version: String,
}

async fn banner(State(state): State<Arc<ApiState>>) -> Json<BannerResponse> {
    Json(BannerResponse {
        message: format!("{} backend is running!", state.shop_name),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/version", get(version))
}
