//! Test doubles for the slot store.

pub use crate::store::MockSlotStore;
