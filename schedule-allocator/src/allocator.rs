use crate::{error::*, models::*, repository::SlotRepository};
use chrono::NaiveDate;
use identity_access::{IdentityDirectory, IdentityError, Role};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Finds and reserves exactly one slot per (doctor, date), and flips
/// occupancy state on booking closure.
pub struct ScheduleAllocator {
    slots: Arc<dyn SlotRepository>,
    directory: Arc<dyn IdentityDirectory>,
}

impl ScheduleAllocator {
    pub fn new(slots: Arc<dyn SlotRepository>, directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { slots, directory }
    }

    /// The referenced identity must hold the doctor role.
    async fn assert_doctor(&self, doctor_id: Uuid) -> ScheduleResult<()> {
        match self.directory.role_of(doctor_id).await? {
            Role::Doctor => Ok(()),
            _ => Err(IdentityError::AccessDenied.into()),
        }
    }

    /// Set up a new slot for a doctor on a calendar day.
    pub async fn create_slot(&self, new_slot: NewSlot, actor: Uuid) -> ScheduleResult<ScheduleSlot> {
        if !new_slot.time_window_valid() {
            return Err(ScheduleError::InvalidTimeWindow);
        }
        self.assert_doctor(new_slot.doctor_id).await?;

        let slot = self.slots.insert(&new_slot.into_slot(actor)).await?;
        info!(slot_id = %slot.id, doctor_id = %slot.doctor_id, date = %slot.date, "schedule slot created");
        Ok(slot)
    }

    /// The unique free slot for a doctor on a date.
    pub async fn find_free_slot(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<ScheduleSlot> {
        self.assert_doctor(doctor_id).await?;
        self.slots
            .free_slot_on(doctor_id, date)
            .await?
            .ok_or(ScheduleError::SlotUnavailable)
    }

    /// Find and lock the free slot for (doctor, date).
    ///
    /// The occupancy flip is a compare-and-set, so of two concurrent
    /// reservations exactly one wins; the loser gets `SlotUnavailable`.
    pub async fn reserve(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        actor: Uuid,
    ) -> ScheduleResult<ScheduleSlot> {
        let slot = self.find_free_slot(doctor_id, date).await?;
        let reserved = self.slots.reserve(slot.id, actor).await.map_err(|e| match e {
            // Lost the race after the lookup: report it as unavailability.
            ScheduleError::SlotNotFound => ScheduleError::SlotUnavailable,
            other => other,
        })?;
        debug!(slot_id = %reserved.id, doctor_id = %doctor_id, date = %date, "slot reserved");
        Ok(reserved)
    }

    /// Free the slot for (doctor, date), if one exists. Used when a booking
    /// closes or its creation is rolled back.
    pub async fn release(&self, doctor_id: Uuid, date: NaiveDate, actor: Uuid) -> ScheduleResult<()> {
        if let Some(slot) = self.slots.slot_on(doctor_id, date).await? {
            self.slots
                .set_occupancy(slot.id, Occupancy::Free, actor)
                .await?;
            debug!(slot_id = %slot.id, doctor_id = %doctor_id, date = %date, "slot released");
        }
        Ok(())
    }

    /// Idempotent occupancy write.
    pub async fn set_occupancy(
        &self,
        slot_id: Uuid,
        state: Occupancy,
        actor: Uuid,
    ) -> ScheduleResult<ScheduleSlot> {
        self.slots.set_occupancy(slot_id, state, actor).await
    }

    /// Soft-delete a slot. An occupied slot cannot be deleted.
    pub async fn trash_slot(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<()> {
        self.slots.trash(slot_id, actor).await
    }
}
