use crate::{error::*, models::*, settlement};
use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

pub mod postgres;

/// Storage contract for cards and payment records.
///
/// Cards and payments share one contract because `settle` must mutate both
/// under a single lock: the funds check, the payment upsert, and the balance
/// debit are one atomic unit. Trashed rows are invisible to every lookup
/// and uniqueness check.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn find_card(&self, id: Uuid) -> LedgerResult<Option<Card>>;

    async fn find_card_for_patient(&self, patient_id: Uuid) -> LedgerResult<Option<Card>>;

    async fn card_number_taken(&self, number: &str) -> LedgerResult<bool>;

    /// Insert a new card. Fails with `CardAlreadyExists` when the patient
    /// already holds a non-deleted card or the number is in use.
    async fn insert_card(&self, card: &Card) -> LedgerResult<Card>;

    /// Add to the funded balance.
    async fn credit(&self, card_id: Uuid, amount: Decimal, actor: Uuid) -> LedgerResult<Card>;

    /// Apply one charge atomically: funds check, payment upsert, debit.
    /// The decision itself is [`settlement::decide`]; implementations only
    /// provide the locking and persistence around it.
    async fn settle(&self, settlement: &Settlement) -> LedgerResult<PaymentRecord>;

    async fn payment_for_booking(&self, booking_id: Uuid) -> LedgerResult<Option<PaymentRecord>>;

    async fn payments_for_card(&self, card_id: Uuid) -> LedgerResult<Vec<PaymentRecord>>;

    /// Soft-delete a card.
    async fn trash_card(&self, card_id: Uuid, actor: Uuid) -> LedgerResult<()>;
}

#[derive(Default)]
struct LedgerTables {
    cards: HashMap<Uuid, Card>,
    payments: HashMap<Uuid, PaymentRecord>,
}

/// In-memory ledger repository for development and testing.
///
/// One mutex over both tables makes every compound operation atomic.
pub struct InMemoryLedgerRepository {
    tables: Mutex<LedgerTables>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(LedgerTables::default()),
        }
    }
}

impl Default for InMemoryLedgerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedgerRepository {
    async fn find_card(&self, id: Uuid) -> LedgerResult<Option<Card>> {
        let tables = self.tables.lock();
        Ok(tables.cards.get(&id).filter(|c| !c.meta.deleted).cloned())
    }

    async fn find_card_for_patient(&self, patient_id: Uuid) -> LedgerResult<Option<Card>> {
        let tables = self.tables.lock();
        Ok(tables
            .cards
            .values()
            .find(|c| !c.meta.deleted && c.patient_id == patient_id)
            .cloned())
    }

    async fn card_number_taken(&self, number: &str) -> LedgerResult<bool> {
        let tables = self.tables.lock();
        Ok(tables
            .cards
            .values()
            .any(|c| !c.meta.deleted && c.card_number == number))
    }

    async fn insert_card(&self, card: &Card) -> LedgerResult<Card> {
        let mut tables = self.tables.lock();
        let taken = tables.cards.values().any(|c| {
            !c.meta.deleted
                && (c.patient_id == card.patient_id || c.card_number == card.card_number)
        });
        if taken {
            return Err(LedgerError::CardAlreadyExists);
        }
        tables.cards.insert(card.id, card.clone());
        Ok(card.clone())
    }

    async fn credit(&self, card_id: Uuid, amount: Decimal, actor: Uuid) -> LedgerResult<Card> {
        let mut tables = self.tables.lock();
        let card = tables
            .cards
            .get_mut(&card_id)
            .filter(|c| !c.meta.deleted)
            .ok_or(LedgerError::CardNotFound)?;
        card.funded_balance += amount;
        card.meta.touch(actor);
        Ok(card.clone())
    }

    async fn settle(&self, settlement: &Settlement) -> LedgerResult<PaymentRecord> {
        let mut tables = self.tables.lock();
        let card = tables
            .cards
            .get(&settlement.card_id)
            .filter(|c| !c.meta.deleted)
            .ok_or(LedgerError::CardNotFound)?;
        let existing = tables
            .payments
            .values()
            .find(|p| !p.meta.deleted && p.booking_id == settlement.booking_id);

        let outcome = settlement::decide(card, existing, settlement)?;

        tables.cards.insert(outcome.card.id, outcome.card);
        tables
            .payments
            .insert(outcome.payment.id, outcome.payment.clone());
        Ok(outcome.payment)
    }

    async fn payment_for_booking(&self, booking_id: Uuid) -> LedgerResult<Option<PaymentRecord>> {
        let tables = self.tables.lock();
        Ok(tables
            .payments
            .values()
            .find(|p| !p.meta.deleted && p.booking_id == booking_id)
            .cloned())
    }

    async fn payments_for_card(&self, card_id: Uuid) -> LedgerResult<Vec<PaymentRecord>> {
        let tables = self.tables.lock();
        let mut payments: Vec<PaymentRecord> = tables
            .payments
            .values()
            .filter(|p| !p.meta.deleted && p.card_id == card_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.meta.created_at);
        Ok(payments)
    }

    async fn trash_card(&self, card_id: Uuid, actor: Uuid) -> LedgerResult<()> {
        let mut tables = self.tables.lock();
        let card = tables
            .cards
            .get_mut(&card_id)
            .filter(|c| !c.meta.deleted)
            .ok_or(LedgerError::CardNotFound)?;
        card.meta.trash(actor);
        Ok(())
    }
}
