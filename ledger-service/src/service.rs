use crate::{cards, error::*, models::*, repository::LedgerRepository};
use async_trait::async_trait;
use identity_access::IdentityDirectory;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Booking-side resolution of what a charge applies to.
///
/// Implemented by the booking workflow; the ledger only sees the resolved
/// card, item, and price ceiling.
#[async_trait]
pub trait PaymentTarget: Send + Sync {
    async fn payment_target(&self, booking_id: Uuid) -> LedgerResult<ChargeTarget>;
}

/// Tracks funded balances and the payment applied to each booking.
pub struct LedgerService {
    repo: Arc<dyn LedgerRepository>,
    target: Arc<dyn PaymentTarget>,
    directory: Arc<dyn IdentityDirectory>,
}

impl LedgerService {
    pub fn new(
        repo: Arc<dyn LedgerRepository>,
        target: Arc<dyn PaymentTarget>,
        directory: Arc<dyn IdentityDirectory>,
    ) -> Self {
        Self {
            repo,
            target,
            directory,
        }
    }

    /// Resolve or open the patient's card. Idempotent.
    pub async fn ensure_card(&self, patient_id: Uuid, actor: Uuid) -> LedgerResult<Card> {
        self.directory.resolve_user(patient_id).await?;
        cards::ensure_card(self.repo.as_ref(), patient_id, actor).await
    }

    /// Add funds to the patient's card. There is no upper bound.
    pub async fn top_up(
        &self,
        patient_id: Uuid,
        amount: Decimal,
        actor: Uuid,
    ) -> LedgerResult<Card> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        let card = self.ensure_card(patient_id, actor).await?;
        if card.status == CardStatus::Inactive {
            return Err(LedgerError::CardInactive);
        }
        let card = self.repo.credit(card.id, amount, actor).await?;
        info!(card_id = %card.id, %amount, "card topped up");
        Ok(card)
    }

    /// Apply one (possibly partial) payment to a booking.
    pub async fn charge_for_booking(
        &self,
        booking_id: Uuid,
        amount: Decimal,
        method: impl Into<String>,
        actor: Uuid,
    ) -> LedgerResult<PaymentRecord> {
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount);
        }
        let target = self.target.payment_target(booking_id).await?;

        let payment = self
            .repo
            .settle(&Settlement {
                card_id: target.card_id,
                booking_id: target.booking_id,
                amount,
                method: method.into(),
                price: target.price,
                actor,
            })
            .await?;
        info!(
            booking_id = %booking_id,
            %amount,
            status = payment.status.as_str(),
            "payment applied"
        );
        Ok(payment)
    }

    /// Per-payment detail for a patient, with the sum of everything paid.
    pub async fn detail_for_patient(&self, patient_id: Uuid) -> LedgerResult<PatientPayments> {
        let patient = self.directory.resolve_user(patient_id).await?;
        let card = self
            .repo
            .find_card_for_patient(patient_id)
            .await?
            .ok_or(LedgerError::CardNotFound)?;

        let mut lines = Vec::new();
        let mut total_paid = Decimal::ZERO;
        for payment in self.repo.payments_for_card(card.id).await? {
            let target = match self.target.payment_target(payment.booking_id).await {
                Ok(target) => target,
                Err(LedgerError::BookingNotFound) => {
                    warn!(payment_id = %payment.id, "payment without a resolvable booking, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };
            total_paid += payment.amount_paid;
            lines.push(PaymentLine {
                booking_id: payment.booking_id,
                item_name: target.item_name,
                amount_paid: payment.amount_paid,
                status: payment.status,
                paid_on: payment.meta.updated_at,
            });
        }

        Ok(PatientPayments {
            patient_id,
            patient_name: patient.full_name,
            payments: lines,
            total_paid,
        })
    }
}
