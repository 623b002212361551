use crate::{error::*, models::*, repository::BookingRepository};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use identity_access::{Actor, IdentityDirectory, IdentityError};
use ledger_service::{
    cards, ChargeTarget, LedgerError, LedgerRepository, LedgerResult, PaymentTarget,
};
use rust_decimal::Decimal;
use schedule_allocator::ScheduleAllocator;
use service_catalog::{CatalogError, ServiceCatalog};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Orchestrates creation and closure of bookings across the card, the
/// schedule allocator, and the catalog.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    allocator: Arc<ScheduleAllocator>,
    catalog: Arc<dyn ServiceCatalog>,
    ledger: Arc<dyn LedgerRepository>,
    directory: Arc<dyn IdentityDirectory>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        allocator: Arc<ScheduleAllocator>,
        catalog: Arc<dyn ServiceCatalog>,
        ledger: Arc<dyn LedgerRepository>,
        directory: Arc<dyn IdentityDirectory>,
    ) -> Self {
        Self {
            bookings,
            allocator,
            catalog,
            ledger,
            directory,
        }
    }

    /// Book an item with a doctor starting on `from_date`.
    ///
    /// The patient's card is resolved (or opened) first, then the doctor's
    /// slot for the calendar day of `from_date` is reserved. The
    /// reservation is the commit point: if persisting the booking fails
    /// afterwards, the slot is released before the error propagates.
    pub async fn create(
        &self,
        patient_id: Uuid,
        item_id: Uuid,
        doctor_id: Uuid,
        from_date: DateTime<Utc>,
        actor: Uuid,
    ) -> BookingResult<Booking> {
        self.directory.resolve_user(patient_id).await?;
        let card = cards::ensure_card(self.ledger.as_ref(), patient_id, actor).await?;
        let item = self.catalog.resolve_item(item_id).await?;

        let slot_date = from_date.date_naive();
        self.allocator.reserve(doctor_id, slot_date, actor).await?;

        let booking = Booking::new(card.id, &item, doctor_id, from_date, actor);
        match self.bookings.insert(&booking).await {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    doctor_id = %doctor_id,
                    date = %slot_date,
                    "booking created"
                );
                Ok(booking)
            }
            Err(e) => {
                // Roll the reservation back so the slot is not stranded.
                if let Err(release_err) =
                    self.allocator.release(doctor_id, slot_date, actor).await
                {
                    error!(
                        doctor_id = %doctor_id,
                        date = %slot_date,
                        error = %release_err,
                        "failed to release slot after booking rollback"
                    );
                }
                Err(e)
            }
        }
    }

    /// Fetch a booking. Trashed bookings are not found.
    pub async fn get(&self, booking_id: Uuid) -> BookingResult<Booking> {
        self.bookings
            .find(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)
    }

    /// Edit a booking. Only the assigned doctor or a director may do so.
    ///
    /// `from_date` is re-stamped in place (the slot is not moved), a new
    /// `item_id` re-binds the booking to another catalog item, and setting
    /// `to_date` closes the booking and frees the slot resolved from the
    /// current (doctor, from_date) pair.
    pub async fn update(
        &self,
        booking_id: Uuid,
        actor: Actor,
        patch: BookingPatch,
    ) -> BookingResult<Booking> {
        let mut booking = self.get(booking_id).await?;

        if booking.doctor_id != actor.id && !actor.is_director() {
            return Err(IdentityError::AccessDenied.into());
        }
        if booking.status == BookingStatus::Done {
            return Err(BookingError::BookingClosed);
        }

        if let Some(from_date) = patch.from_date {
            booking.from_date = from_date;
        }
        if let Some(item_id) = patch.item_id {
            booking.item_id = item_id;
        }
        if patch.from_date.is_some() || patch.item_id.is_some() {
            let item = self.catalog.resolve_item(booking.item_id).await?;
            booking.expected_completion = booking.from_date + Duration::days(item.duration_days);
        }

        let closing = patch.to_date;
        if let Some(to_date) = closing {
            if to_date < booking.from_date {
                return Err(BookingError::InvalidDateRange);
            }
            booking.to_date = Some(to_date);
            booking.status = BookingStatus::Done;
        }

        booking.meta.touch(actor.id);
        let booking = self.bookings.update(&booking).await?;

        if closing.is_some() {
            self.allocator
                .release(booking.doctor_id, booking.from_date.date_naive(), actor.id)
                .await?;
            info!(booking_id = %booking.id, "booking closed");
        }
        Ok(booking)
    }

    /// A patient's card with its bookings, joined with item and doctor
    /// names and the amount paid so far per booking.
    pub async fn patient_overview(&self, patient_id: Uuid) -> BookingResult<PatientOverview> {
        self.directory.resolve_user(patient_id).await?;
        let card = self
            .ledger
            .find_card_for_patient(patient_id)
            .await
            .map_err(BookingError::from)?
            .ok_or(BookingError::Ledger(LedgerError::CardNotFound))?;

        let mut lines = Vec::new();
        for booking in self.bookings.for_card(card.id).await? {
            let item = self.catalog.resolve_item(booking.item_id).await?;
            let doctor = self.directory.resolve_user(booking.doctor_id).await?;
            let amount_paid = self
                .ledger
                .payment_for_booking(booking.id)
                .await
                .map_err(BookingError::from)?
                .map(|p| p.amount_paid)
                .unwrap_or(Decimal::ZERO);

            lines.push(BookingLine {
                booking_id: booking.id,
                item_id: item.id,
                item_name: item.name,
                doctor_id: doctor.id,
                doctor_name: doctor.full_name,
                from_date: booking.from_date,
                expected_completion: booking.expected_completion,
                to_date: booking.to_date,
                status: booking.status,
                amount_paid,
            });
        }

        Ok(PatientOverview {
            patient_id,
            card_number: card.card_number,
            funded_balance: card.funded_balance,
            bookings: lines,
        })
    }

    /// Soft-delete a booking.
    pub async fn trash(&self, booking_id: Uuid, actor: Uuid) -> BookingResult<()> {
        self.bookings.trash(booking_id, actor).await
    }
}

/// The ledger resolves bookings through this port when applying a charge.
#[async_trait]
impl PaymentTarget for BookingService {
    async fn payment_target(&self, booking_id: Uuid) -> LedgerResult<ChargeTarget> {
        let booking = self
            .bookings
            .find(booking_id)
            .await
            .map_err(booking_error_for_ledger)?
            .ok_or(LedgerError::BookingNotFound)?;

        let item = match self.catalog.resolve_item(booking.item_id).await {
            Ok(item) => item,
            Err(CatalogError::ItemNotFound) => {
                warn!(booking_id = %booking_id, "booking references a missing catalog item");
                return Err(LedgerError::Storage(
                    anyhow::anyhow!("booking {booking_id} references a missing catalog item")
                        .into(),
                ));
            }
            Err(CatalogError::Storage(e)) => return Err(LedgerError::Storage(e)),
        };

        Ok(ChargeTarget {
            booking_id: booking.id,
            card_id: booking.card_id,
            item_id: item.id,
            item_name: item.name,
            price: item.price,
        })
    }
}

fn booking_error_for_ledger(error: BookingError) -> LedgerError {
    match error {
        BookingError::Storage(e) => LedgerError::Storage(e),
        BookingError::Ledger(e) => e,
        other => {
            error!(error = %other, "unexpected booking error during charge resolution");
            LedgerError::BookingNotFound
        }
    }
}
