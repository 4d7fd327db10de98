use barberbook_core::{
    errors::BookingError,
    models::slot::{Slot, SlotStatus},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: String,
    pub slot_date: NaiveDate,
    pub slot_hour: i32,
    pub status: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbSlot> for Slot {
    type Error = BookingError;

    fn try_from(row: DbSlot) -> Result<Self, Self::Error> {
        let status: SlotStatus = row.status.parse()?;
        Ok(Slot {
            id: row.id,
            date: row.slot_date,
            time: format!("{}:00", row.slot_hour),
            status,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
        })
    }
}
