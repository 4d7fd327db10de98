//! # Barberbook Core
//!
//! Domain types shared by the store and API crates: appointment slots and
//! their status transitions, request and response bodies, the error
//! taxonomy, and the weekly slot window.

pub mod errors;
pub mod models;
pub mod schedule;
