//! # Slot Store
//!
//! The storage seam for appointment slots. Handlers only ever talk to a
//! `dyn SlotStore`, so the in-memory table used by default and the
//! Postgres table can be swapped without touching call sites.

use async_trait::async_trait;
use barberbook_core::{
    errors::BookingResult,
    models::slot::{Customer, Slot},
};
use mockall::automock;

/// Storage for the current slot window.
///
/// Implementations must make `book_if_free` and `toggle` atomic per slot:
/// two concurrent bookings of the same free slot yield exactly one success
/// and one `BookingError::Conflict`.
#[automock]
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// All slots, ordered by date then hour.
    async fn list(&self) -> BookingResult<Vec<Slot>>;

    async fn get(&self, id: &str) -> BookingResult<Option<Slot>>;

    /// Books the slot if, and only if, it is currently free.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - no slot with this id
    /// * `BookingError::Conflict` - slot is booked or blocked
    async fn book_if_free(&self, id: &str, customer: Customer) -> BookingResult<Slot>;

    /// Applies the admin cycle (`free -> blocked -> free`, `booked -> free`).
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - no slot with this id
    async fn toggle(&self, id: &str) -> BookingResult<Slot>;

    /// Discards every slot and installs `slots` as the new window.
    async fn replace_all(&self, slots: Vec<Slot>) -> BookingResult<()>;
}
