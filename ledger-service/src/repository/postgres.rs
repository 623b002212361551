//! PostgreSQL-backed ledger repository
//!
//! `settle` runs in one transaction and locks the card row (and the
//! booking's payment row, when it exists) with `SELECT ... FOR UPDATE`, so
//! concurrent charges serialize on the card.

use crate::{error::*, models::*, repository::LedgerRepository, settlement};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use storage_core::{RecordMeta, StorageError};
use tracing::debug;
use uuid::Uuid;

pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_card_status(value: &str) -> Result<CardStatus, sqlx::Error> {
    match value {
        "active" => Ok(CardStatus::Active),
        "inactive" => Ok(CardStatus::Inactive),
        other => Err(sqlx::Error::Decode(
            format!("unknown card status '{other}'").into(),
        )),
    }
}

fn parse_payment_status(value: &str) -> Result<PaymentStatus, sqlx::Error> {
    match value {
        "not_paid" => Ok(PaymentStatus::NotPaid),
        "paid" => Ok(PaymentStatus::Paid),
        other => Err(sqlx::Error::Decode(
            format!("unknown payment status '{other}'").into(),
        )),
    }
}

fn row_meta(row: &PgRow) -> Result<RecordMeta, sqlx::Error> {
    Ok(RecordMeta {
        created_at: row.try_get("created_at")?,
        created_by: row.try_get("created_by")?,
        updated_at: row.try_get("updated_at")?,
        updated_by: row.try_get("updated_by")?,
        deleted: row.try_get("deleted")?,
    })
}

fn row_to_card(row: &PgRow) -> Result<Card, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Card {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        card_number: row.try_get("card_number")?,
        funded_balance: row.try_get("funded_balance")?,
        status: parse_card_status(&status)?,
        meta: row_meta(row)?,
    })
}

fn row_to_payment(row: &PgRow) -> Result<PaymentRecord, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(PaymentRecord {
        id: row.try_get("id")?,
        booking_id: row.try_get("booking_id")?,
        card_id: row.try_get("card_id")?,
        amount_paid: row.try_get("amount_paid")?,
        method: row.try_get("method")?,
        status: parse_payment_status(&status)?,
        meta: row_meta(row)?,
    })
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    async fn find_card(&self, id: Uuid) -> LedgerResult<Option<Card>> {
        let row = sqlx::query(r#"SELECT * FROM ledger_cards WHERE id = $1 AND deleted = false"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_card)
            .transpose()
            .map_err(|e| LedgerError::Storage(e.into()))
    }

    async fn find_card_for_patient(&self, patient_id: Uuid) -> LedgerResult<Option<Card>> {
        let row = sqlx::query(
            r#"SELECT * FROM ledger_cards WHERE patient_id = $1 AND deleted = false"#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_card)
            .transpose()
            .map_err(|e| LedgerError::Storage(e.into()))
    }

    async fn card_number_taken(&self, number: &str) -> LedgerResult<bool> {
        let row = sqlx::query(
            r#"SELECT 1 AS present FROM ledger_cards WHERE card_number = $1 AND deleted = false"#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;
        Ok(row.is_some())
    }

    async fn insert_card(&self, card: &Card) -> LedgerResult<Card> {
        debug!(patient_id = %card.patient_id, "inserting ledger card");

        let result = sqlx::query(
            r#"
            INSERT INTO ledger_cards (
                id, patient_id, card_number, funded_balance, status,
                created_at, created_by, updated_at, updated_by, deleted
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, false
            WHERE NOT EXISTS (
                SELECT 1 FROM ledger_cards
                WHERE (patient_id = $2 OR card_number = $3) AND deleted = false
            )
            "#,
        )
        .bind(card.id)
        .bind(card.patient_id)
        .bind(&card.card_number)
        .bind(card.funded_balance)
        .bind(card.status.as_str())
        .bind(card.meta.created_at)
        .bind(card.meta.created_by)
        .bind(card.meta.updated_at)
        .bind(card.meta.updated_by)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::CardAlreadyExists);
        }
        Ok(card.clone())
    }

    async fn credit(&self, card_id: Uuid, amount: Decimal, actor: Uuid) -> LedgerResult<Card> {
        let row = sqlx::query(
            r#"
            UPDATE ledger_cards
            SET funded_balance = funded_balance + $2, updated_at = NOW(), updated_by = $3
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(card_id)
        .bind(amount)
        .bind(actor)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        match row {
            Some(row) => row_to_card(&row).map_err(|e| LedgerError::Storage(e.into())),
            None => Err(LedgerError::CardNotFound),
        }
    }

    async fn settle(&self, settlement: &Settlement) -> LedgerResult<PaymentRecord> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        let card_row = sqlx::query(
            r#"SELECT * FROM ledger_cards WHERE id = $1 AND deleted = false FOR UPDATE"#,
        )
        .bind(settlement.card_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::from)?;
        let card = match card_row {
            Some(row) => row_to_card(&row).map_err(|e| LedgerError::Storage(e.into()))?,
            None => return Err(LedgerError::CardNotFound),
        };

        let payment_row = sqlx::query(
            r#"
            SELECT * FROM payment_records
            WHERE booking_id = $1 AND deleted = false
            FOR UPDATE
            "#,
        )
        .bind(settlement.booking_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StorageError::from)?;
        let existing = payment_row
            .as_ref()
            .map(row_to_payment)
            .transpose()
            .map_err(|e| LedgerError::Storage(e.into()))?;

        let outcome = settlement::decide(&card, existing.as_ref(), settlement)?;

        if outcome.payment_created {
            sqlx::query(
                r#"
                INSERT INTO payment_records (
                    id, booking_id, card_id, amount_paid, method, status,
                    created_at, created_by, updated_at, updated_by, deleted
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, false)
                "#,
            )
            .bind(outcome.payment.id)
            .bind(outcome.payment.booking_id)
            .bind(outcome.payment.card_id)
            .bind(outcome.payment.amount_paid)
            .bind(&outcome.payment.method)
            .bind(outcome.payment.status.as_str())
            .bind(outcome.payment.meta.created_at)
            .bind(outcome.payment.meta.created_by)
            .bind(outcome.payment.meta.updated_at)
            .bind(outcome.payment.meta.updated_by)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        } else {
            sqlx::query(
                r#"
                UPDATE payment_records
                SET amount_paid = $2, method = $3, status = $4,
                    updated_at = $5, updated_by = $6
                WHERE id = $1
                "#,
            )
            .bind(outcome.payment.id)
            .bind(outcome.payment.amount_paid)
            .bind(&outcome.payment.method)
            .bind(outcome.payment.status.as_str())
            .bind(outcome.payment.meta.updated_at)
            .bind(outcome.payment.meta.updated_by)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::from)?;
        }

        sqlx::query(
            r#"
            UPDATE ledger_cards
            SET funded_balance = $2, updated_at = $3, updated_by = $4
            WHERE id = $1
            "#,
        )
        .bind(outcome.card.id)
        .bind(outcome.card.funded_balance)
        .bind(outcome.card.meta.updated_at)
        .bind(outcome.card.meta.updated_by)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::from)?;

        tx.commit().await.map_err(StorageError::from)?;
        Ok(outcome.payment)
    }

    async fn payment_for_booking(&self, booking_id: Uuid) -> LedgerResult<Option<PaymentRecord>> {
        let row = sqlx::query(
            r#"SELECT * FROM payment_records WHERE booking_id = $1 AND deleted = false"#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::from)?;

        row.as_ref()
            .map(row_to_payment)
            .transpose()
            .map_err(|e| LedgerError::Storage(e.into()))
    }

    async fn payments_for_card(&self, card_id: Uuid) -> LedgerResult<Vec<PaymentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM payment_records
            WHERE card_id = $1 AND deleted = false
            ORDER BY created_at ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from)?;

        rows.iter()
            .map(row_to_payment)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LedgerError::Storage(e.into()))
    }

    async fn trash_card(&self, card_id: Uuid, actor: Uuid) -> LedgerResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE ledger_cards
            SET deleted = true, updated_at = NOW(), updated_by = $2
            WHERE id = $1 AND deleted = false
            "#,
        )
        .bind(card_id)
        .bind(actor)
        .execute(&self.pool)
        .await
        .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::CardNotFound);
        }
        Ok(())
    }
}
