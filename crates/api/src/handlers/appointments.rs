//! # Appointment Handlers
//!
//! Listing, customer booking, and the admin toggle for appointment slots.
//!
//! All state lives behind [`SlotStore`](barberbook_db::SlotStore); handlers
//! do no read-modify-write of their own. Clients re-fetch the list after
//! every mutation, there is no push channel.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::HeaderMap,
};
use barberbook_core::models::{
    booking::{BookSlotRequest, BookSlotResponse},
    slot::{Customer, Slot},
};
use std::sync::Arc;
use tracing::info;

use crate::{ApiState, handlers::json_or_default, middleware::error_handling::AppError};

/// Returns every slot in the current window.
///
/// # Endpoint
///
/// ```text
/// GET /api/appointments
/// ```
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let slots = state.store.list().await?;
    Ok(Json(slots))
}

/// Books a free slot for a customer.
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments/:id/book
/// { "name": "Anna", "email": "a@x.com" }
/// ```
///
/// Fields are validated before the store is consulted, so a bad request
/// never mutates anything. A missing or unparsable body counts as empty. The notification sink is told about the booking
/// afterwards; its outcome is reported as `webhookStatus` and never undoes
/// the booking.
///
/// # Errors
///
/// * `400` - name or email missing or blank
/// * `404` - unknown slot id
/// * `409` - slot already booked or blocked
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    payload: Result<Json<BookSlotRequest>, JsonRejection>,
) -> Result<Json<BookSlotResponse>, AppError> {
    let payload: BookSlotRequest = json_or_default(payload);
    let customer = Customer::new(payload.name, payload.email)?;

    let appointment = state.store.book_if_free(&id, customer).await?;
    info!("Slot {} booked", appointment.id);

    let webhook_status = state.notifier.appointment_booked(&appointment).await;

    Ok(Json(BookSlotResponse {
        appointment,
        webhook_status,
    }))
}

/// Admin cycle for a slot: `free -> blocked -> free`, `booked -> free`.
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments/:id/toggle
/// ```
///
/// # Errors
///
/// * `401` - sessions are required and none was presented
/// * `404` - unknown slot id
#[axum::debug_handler]
pub async fn toggle_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Slot>, AppError> {
    state.admin.authorize(&headers).await?;

    let slot = state.store.toggle(&id).await?;
    info!("Slot {} toggled to {}", slot.id, slot.status);
    Ok(Json(slot))
}
