use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/appointments",
            get(handlers::appointments::list_appointments),
        )
        .route(
            "/api/appointments/:id/book",
            post(handlers::appointments::book_appointment),
        )
        .route(
            "/api/appointments/:id/toggle",
            post(handlers::appointments::toggle_appointment),
        )
}
