use std::collections::HashMap;

use async_trait::async_trait;
use barberbook_core::{
    errors::{BookingError, BookingResult},
    models::slot::{Customer, Slot},
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::store::SlotStore;

/// In-process slot store.
///
/// Every mutation takes the write lock for its whole check-and-set, which
/// serializes writers and closes the double-booking window.
#[derive(Debug, Default)]
pub struct MemorySlotStore {
    table: RwLock<SlotTable>,
}

#[derive(Debug, Default)]
struct SlotTable {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl SlotTable {
    fn build(slots: Vec<Slot>) -> BookingResult<Self> {
        let mut index = HashMap::with_capacity(slots.len());
        for (position, slot) in slots.iter().enumerate() {
            if index.insert(slot.id.clone(), position).is_some() {
                return Err(BookingError::Validation(format!(
                    "Duplicate slot id: {}",
                    slot.id
                )));
            }
        }
        Ok(Self { slots, index })
    }

    fn slot_mut(&mut self, id: &str) -> BookingResult<&mut Slot> {
        let position = *self.index.get(id).ok_or_else(BookingError::slot_not_found)?;
        Ok(&mut self.slots[position])
    }
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with `slots`.
    pub fn with_slots(slots: Vec<Slot>) -> BookingResult<Self> {
        Ok(Self {
            table: RwLock::new(SlotTable::build(slots)?),
        })
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.slots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SlotStore for MemorySlotStore {
    async fn list(&self) -> BookingResult<Vec<Slot>> {
        Ok(self.table.read().await.slots.clone())
    }

    async fn get(&self, id: &str) -> BookingResult<Option<Slot>> {
        let table = self.table.read().await;
        Ok(table.index.get(id).map(|&position| table.slots[position].clone()))
    }

    async fn book_if_free(&self, id: &str, customer: Customer) -> BookingResult<Slot> {
        let mut table = self.table.write().await;
        let slot = table.slot_mut(id)?;
        slot.book(customer)?;
        debug!("Booked slot {} in memory", id);
        Ok(slot.clone())
    }

    async fn toggle(&self, id: &str) -> BookingResult<Slot> {
        let mut table = self.table.write().await;
        let slot = table.slot_mut(id)?;
        let status = slot.toggle();
        debug!("Toggled slot {} to {}", id, status);
        Ok(slot.clone())
    }

    async fn replace_all(&self, slots: Vec<Slot>) -> BookingResult<()> {
        let fresh = SlotTable::build(slots)?;
        *self.table.write().await = fresh;
        Ok(())
    }
}
