use async_trait::async_trait;
use barberbook_core::{
    errors::{BookingError, BookingResult},
    models::slot::{Customer, Slot},
};
use eyre::WrapErr;
use sqlx::{Pool, Postgres};

use crate::{models::DbSlot, store::SlotStore};

const SLOT_COLUMNS: &str =
    "id, slot_date, slot_hour, status, customer_name, customer_email, updated_at";

/// Slot store backed by the `appointment_slots` table.
///
/// Booking and toggling are single `UPDATE` statements, so the status check
/// and the write happen atomically inside Postgres.
#[derive(Debug, Clone)]
pub struct PgSlotStore {
    pool: Pool<Postgres>,
}

impl PgSlotStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn exists(&self, id: &str) -> BookingResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (SELECT 1 FROM appointment_slots WHERE id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .wrap_err("Failed to look up slot")?;

        Ok(exists)
    }
}

fn into_slots(rows: Vec<DbSlot>) -> BookingResult<Vec<Slot>> {
    rows.into_iter().map(Slot::try_from).collect()
}

#[async_trait]
impl SlotStore for PgSlotStore {
    async fn list(&self) -> BookingResult<Vec<Slot>> {
        let rows = sqlx::query_as::<_, DbSlot>(&format!(
            "SELECT {} FROM appointment_slots ORDER BY slot_date ASC, slot_hour ASC",
            SLOT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .wrap_err("Failed to list slots")?;

        into_slots(rows)
    }

    async fn get(&self, id: &str) -> BookingResult<Option<Slot>> {
        let row = sqlx::query_as::<_, DbSlot>(&format!(
            "SELECT {} FROM appointment_slots WHERE id = $1",
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to fetch slot")?;

        row.map(Slot::try_from).transpose()
    }

    async fn book_if_free(&self, id: &str, customer: Customer) -> BookingResult<Slot> {
        tracing::debug!("Booking slot in database: id={}", id);

        let row = sqlx::query_as::<_, DbSlot>(&format!(
            r#"
            UPDATE appointment_slots
            SET status = 'booked', customer_name = $2, customer_email = $3, updated_at = NOW()
            WHERE id = $1 AND status = 'free'
            RETURNING {}
            "#,
            SLOT_COLUMNS
        ))
        .bind(id)
        .bind(&customer.name)
        .bind(&customer.email)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to book slot")?;

        match row {
            Some(row) => Slot::try_from(row),
            None if self.exists(id).await? => Err(BookingError::slot_unavailable()),
            None => Err(BookingError::slot_not_found()),
        }
    }

    async fn toggle(&self, id: &str) -> BookingResult<Slot> {
        tracing::debug!("Toggling slot in database: id={}", id);

        let row = sqlx::query_as::<_, DbSlot>(&format!(
            r#"
            UPDATE appointment_slots
            SET status = CASE status WHEN 'free' THEN 'blocked' ELSE 'free' END,
                customer_name = NULL,
                customer_email = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .wrap_err("Failed to toggle slot")?;

        row.map(Slot::try_from)
            .transpose()?
            .ok_or_else(BookingError::slot_not_found)
    }

    async fn replace_all(&self, slots: Vec<Slot>) -> BookingResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        sqlx::query("DELETE FROM appointment_slots")
            .execute(&mut *tx)
            .await
            .wrap_err("Failed to clear slots")?;

        for slot in &slots {
            let hour = slot
                .hour()
                .ok_or_else(|| BookingError::Validation(format!("Invalid slot time: {}", slot.time)))?;

            sqlx::query(
                r#"
                INSERT INTO appointment_slots (id, slot_date, slot_hour, status, customer_name, customer_email)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&slot.id)
            .bind(slot.date)
            .bind(hour as i32)
            .bind(slot.status.as_str())
            .bind(&slot.customer_name)
            .bind(&slot.customer_email)
            .execute(&mut *tx)
            .await
            .wrap_err_with(|| format!("Failed to insert slot {}", slot.id))?;
        }

        tx.commit().await.wrap_err("Failed to commit slot window")?;

        tracing::debug!("Replaced slot window with {} slots", slots.len());
        Ok(())
    }
}
