//! PostgreSQL-backed slot repository
//!
//! The (doctor, date) uniqueness check and the reserve compare-and-set are
//! single guarded statements, so concurrent writers serialize on the row
//! without an explicit transaction.

use crate::{error::*, models::*, repository::SlotRepository};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use storage_core::{RecordMeta, StorageError};
use tracing::debug;
use uuid::Uuid;

pub struct PostgresSlotRepository {
    pool: PgPool,
}

impl PostgresSlotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_occupancy(value: &str) -> Result<Occupancy, sqlx::Error> {
    match value {
        "free" => Ok(Occupancy::Free),
        "occupied" => Ok(Occupancy::Occupied),
        other => Err(sqlx::Error::Decode(
            format!("unknown occupancy '{other}'").into(),
        )),
    }
}

fn row_to_slot(row: &PgRow) -> Result<ScheduleSlot, sqlx::Error> {
    let occupancy: String = row.try_get("occupancy")?;
    Ok(ScheduleSlot {
        id: row.try_get("id")?,
        doctor_id: row.try_get("doctor_id")?,
        date: row.try_get("slot_date")?,
        start_time: row.try_get("start_time")?,
        finish_time: row.try_get("finish_time")?,
        break_start: row.try_get("break_start")?,
        break_end: row.try_get("break_end")?,
        occupancy: parse_occupancy(&occupancy)?,
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
impl SlotRepository for PostgresSlotRepository {
    async fn insert(&self, slot: &ScheduleSlot) -> ScheduleResult<ScheduleSlot> {
        debug!(doctor_id = %slot.doctor_id, date = %slot.date, "inserting schedule slot");

        let result = sqlx::query(
            r#"
            INSERT INTO schedule_slots (
                id, doctor_id, slot_date, start_time, finish_time,
                break_start, break_end, occupancy,
                created_at, created_by, updated_at, updated_by, deleted
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, false
            WHERE NOT EXISTS (
                SELECT 1 FROM schedule_slots
                WHERE doctor_id = $2 AND slot_date = $3 AND deleted = false
            )
            "#,
        )
        .bind(slot.id)
        .bind(slot.doctor_id)
        .bind(slot.date)
        .bind(slot.start_time)
        .bind(slot.finish_time)
        .bind(slot.break_start)
        .bind(slot.break_end)
        .bind(slot.occupancy.as_str())
        .bind(slot.meta.created_at)
        .bind(slot.meta.created_by)
        .bind(slot.meta.updated_at)
        .bind(slot.meta.updated_by)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(ScheduleError::SlotAlreadyExists);
        }
        Ok(slot.clone())
    }

    async fn find(&self, id: Uuid) -> ScheduleResult<Option<ScheduleSlot>> {
        let row = sqlx::query(
            r#"SELECT * FROM schedule_slots WHERE id = $1 AND deleted = false"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_slot)
            .transpose()
            .map_err(|e| ScheduleError::Storage(e.into()))
    }

    async fn slot_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Option<ScheduleSlot>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM schedule_slots
            WHERE doctor_id = $1 AND slot_date = $2 AND deleted = false
            "#,
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_slot)
            .transpose()
            .map_err(|e| ScheduleError::Storage(e.into()))
    }

    async fn free_slot_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Option<ScheduleSlot>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM schedule_slots
            WHERE doctor_id = $1 AND slot_date = $2
              AND occupancy = 'free' AND deleted = false
            "#,
        )
        .bind(doctor_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_slot)
            .transpose()
            .map_err(|e| ScheduleError::Storage(e.into()))
    }

    async fn reserve(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<ScheduleSlot> {
        let row = sqlx::query(
            r#"
            UPDATE schedule_slots
            SET occupancy = 'occupied', updated_at = NOW(), updated_by = $2
            WHERE id = $1 AND occupancy = 'free' AND deleted = false
            RETURNING *
            "#,
        )
        .bind(slot_id)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        match row {
            Some(row) => row_to_slot(&row).map_err(|e| ScheduleError::Storage(e.into())),
            None => match self.find(slot_id).await? {
                Some(_) => Err(ScheduleError::SlotUnavailable),
                None => Err(ScheduleError::SlotNotFound),
            },
        }
    }

    async fn set_occupancy(
        &self,
        slot_id: Uuid,
        state: Occupancy,
        actor: Uuid,
    ) -> ScheduleResult<ScheduleSlot> {
        let row = sqlx::query(
            r#"
            UPDATE schedule_slots
            SET occupancy = $2, updated_at = NOW(), updated_by = $3
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(slot_id)
        .bind(state.as_str())
        .bind(actor)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        match row {
            Some(row) => row_to_slot(&row).map_err(|e| ScheduleError::Storage(e.into())),
            None => Err(ScheduleError::SlotNotFound),
        }
    }

    async fn trash(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE schedule_slots
            SET deleted = true, updated_at = NOW(), updated_by = $2
            WHERE id = $1 AND occupancy = 'free' AND deleted = false
            "#,
        )
        .bind(slot_id)
        .bind(actor)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return match self.find(slot_id).await? {
                Some(_) => Err(ScheduleError::SlotOccupied),
                None => Err(ScheduleError::SlotNotFound),
            };
        }
        Ok(())
    }
}
