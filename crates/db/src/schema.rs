use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create appointment_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointment_slots (
            id VARCHAR(32) PRIMARY KEY,
            slot_date DATE NOT NULL,
            slot_hour INTEGER NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'free',
            customer_name TEXT NULL,
            customer_email TEXT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT unique_slot_hour UNIQUE (slot_date, slot_hour),
            CONSTRAINT valid_status CHECK (status IN ('free', 'booked', 'blocked')),
            CONSTRAINT customer_only_when_booked CHECK (
                (status = 'booked' AND customer_name IS NOT NULL AND customer_email IS NOT NULL)
                OR (status <> 'booked' AND customer_name IS NULL AND customer_email IS NULL)
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointment_slots_order
        ON appointment_slots (slot_date, slot_hour);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized");
    Ok(())
}
