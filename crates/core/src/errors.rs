use thiserror::Error;

/// Failures produced by slot store operations and the booking API.
///
/// The first four variants carry the user-facing message verbatim, since the
/// HTTP layer returns `to_string()` as the `error` field.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Authentication(String),

    /// Outbound booking notification failed. Never fatal to a booking.
    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn missing_customer_fields() -> Self {
        BookingError::Validation("Name and email are required.".to_string())
    }

    pub fn slot_not_found() -> Self {
        BookingError::NotFound("Appointment not found.".to_string())
    }

    pub fn slot_unavailable() -> Self {
        BookingError::Conflict("Appointment is not available.".to_string())
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
