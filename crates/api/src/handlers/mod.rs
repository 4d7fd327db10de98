use axum::{Json, extract::rejection::JsonRejection};
use tracing::debug;

/// Slot listing, booking, and admin toggling
pub mod appointments;
/// Admin login and logout
pub mod auth;

/// Treats an absent, mistyped, or unparsable JSON body as an empty one.
///
/// The handlers' own checks then reject it with a JSON error body instead of
/// the framework's plain-text rejection.
pub(crate) fn json_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Ignoring unusable request body: {}", rejection.body_text());
            T::default()
        }
    }
}
