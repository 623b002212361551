//! PostgreSQL-backed booking repository

use crate::{error::*, models::*, repository::BookingRepository};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use storage_core::{RecordMeta, StorageError};
use tracing::debug;
use uuid::Uuid;

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_status(value: &str) -> Result<BookingStatus, sqlx::Error> {
    match value {
        "in_process" => Ok(BookingStatus::InProcess),
        "done" => Ok(BookingStatus::Done),
        other => Err(sqlx::Error::Decode(
            format!("unknown booking status '{other}'").into(),
        )),
    }
}

fn row_to_booking(row: &PgRow) -> Result<Booking, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Booking {
        id: row.try_get("id")?,
        card_id: row.try_get("card_id")?,
        item_id: row.try_get("item_id")?,
        doctor_id: row.try_get("doctor_id")?,
        from_date: row.try_get("from_date")?,
        expected_completion: row.try_get("expected_completion")?,
        to_date: row.try_get("to_date")?,
        status: parse_status(&status)?,
        meta: RecordMeta {
            created_at: row.try_get("created_at")?,
            created_by: row.try_get("created_by")?,
            updated_at: row.try_get("updated_at")?,
            updated_by: row.try_get("updated_by")?,
            deleted: row.try_get("deleted")?,
        },
    })
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert(&self, booking: &Booking) -> BookingResult<Booking> {
        debug!(booking_id = %booking.id, doctor_id = %booking.doctor_id, "inserting booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, card_id, item_id, doctor_id,
                from_date, expected_completion, to_date, status,
                created_at, created_by, updated_at, updated_by, deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, false)
            "#,
        )
        .bind(booking.id)
        .bind(booking.card_id)
        .bind(booking.item_id)
        .bind(booking.doctor_id)
        .bind(booking.from_date)
        .bind(booking.expected_completion)
        .bind(booking.to_date)
        .bind(booking.status.as_str())
        .bind(booking.meta.created_at)
        .bind(booking.meta.created_by)
        .bind(booking.meta.updated_at)
        .bind(booking.meta.updated_by)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        Ok(booking.clone())
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let row = sqlx::query(r#"SELECT * FROM bookings WHERE id = $1 AND deleted = false"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_booking)
            .transpose()
            .map_err(|e| BookingError::Storage(e.into()))
    }

    async fn update(&self, booking: &Booking) -> BookingResult<Booking> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET item_id = $2, from_date = $3, expected_completion = $4,
                to_date = $5, status = $6, updated_at = $7, updated_by = $8
            WHERE id = $1 AND deleted = false
            "#,
        )
        .bind(booking.id)
        .bind(booking.item_id)
        .bind(booking.from_date)
        .bind(booking.expected_completion)
        .bind(booking.to_date)
        .bind(booking.status.as_str())
        .bind(booking.meta.updated_at)
        .bind(booking.meta.updated_by)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(BookingError::BookingNotFound);
        }
        Ok(booking.clone())
    }

    async fn for_card(&self, card_id: Uuid) -> BookingResult<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM bookings
            WHERE card_id = $1 AND deleted = false
            ORDER BY created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;

        rows.iter()
            .map(row_to_booking)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BookingError::Storage(e.into()))
    }

    async fn trash(&self, id: Uuid, actor: Uuid) -> BookingResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET deleted = true, updated_at = NOW(), updated_by = $2
            WHERE id = $1 AND deleted = false
            "#,
        )
        .bind(id)
        .bind(actor)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(BookingError::BookingNotFound);
        }
        Ok(())
    }
}
