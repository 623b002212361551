use crate::{error::*, models::*};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

pub mod postgres;

/// Storage contract for schedule slots.
///
/// Trashed slots are invisible to every lookup and to the (doctor, date)
/// uniqueness check. `reserve` is the atomic commit point of a booking:
/// implementations must guarantee that of any number of concurrent calls
/// for one slot, exactly one succeeds.
#[async_trait]
pub trait SlotRepository: Send + Sync {
    /// Insert a new slot. Fails with `SlotAlreadyExists` when a non-deleted
    /// slot already exists for the (doctor, date) pair.
    async fn insert(&self, slot: &ScheduleSlot) -> ScheduleResult<ScheduleSlot>;

    async fn find(&self, id: Uuid) -> ScheduleResult<Option<ScheduleSlot>>;

    /// The slot for a doctor on a date, whatever its occupancy.
    async fn slot_on(&self, doctor_id: Uuid, date: NaiveDate)
        -> ScheduleResult<Option<ScheduleSlot>>;

    async fn free_slot_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Option<ScheduleSlot>>;

    /// Compare-and-set `Free` → `Occupied`. Fails with `SlotUnavailable`
    /// when the slot is already occupied.
    async fn reserve(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<ScheduleSlot>;

    /// Idempotent occupancy write.
    async fn set_occupancy(
        &self,
        slot_id: Uuid,
        state: Occupancy,
        actor: Uuid,
    ) -> ScheduleResult<ScheduleSlot>;

    /// Soft-delete. Fails with `SlotOccupied` while the slot is occupied.
    async fn trash(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<()>;
}

/// In-memory slot repository for development and testing.
///
/// A single table lock makes the uniqueness scan in `insert` and the
/// compare-and-set in `reserve` atomic.
pub struct InMemorySlotRepository {
    slots: RwLock<HashMap<Uuid, ScheduleSlot>>,
}

impl InMemorySlotRepository {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySlotRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlotRepository for InMemorySlotRepository {
    async fn insert(&self, slot: &ScheduleSlot) -> ScheduleResult<ScheduleSlot> {
        let mut slots = self.slots.write();
        let taken = slots
            .values()
            .any(|s| !s.meta.deleted && s.doctor_id == slot.doctor_id && s.date == slot.date);
        if taken {
            return Err(ScheduleError::SlotAlreadyExists);
        }
        slots.insert(slot.id, slot.clone());
        Ok(slot.clone())
    }

    async fn find(&self, id: Uuid) -> ScheduleResult<Option<ScheduleSlot>> {
        let slots = self.slots.read();
        Ok(slots.get(&id).filter(|s| !s.meta.deleted).cloned())
    }

    async fn slot_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Option<ScheduleSlot>> {
        let slots = self.slots.read();
        Ok(slots
            .values()
            .find(|s| !s.meta.deleted && s.doctor_id == doctor_id && s.date == date)
            .cloned())
    }

    async fn free_slot_on(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> ScheduleResult<Option<ScheduleSlot>> {
        let slots = self.slots.read();
        Ok(slots
            .values()
            .find(|s| {
                !s.meta.deleted
                    && s.doctor_id == doctor_id
                    && s.date == date
                    && s.occupancy == Occupancy::Free
            })
            .cloned())
    }

    async fn reserve(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<ScheduleSlot> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(&slot_id)
            .filter(|s| !s.meta.deleted)
            .ok_or(ScheduleError::SlotNotFound)?;
        if slot.occupancy != Occupancy::Free {
            return Err(ScheduleError::SlotUnavailable);
        }
        slot.occupancy = Occupancy::Occupied;
        slot.meta.touch(actor);
        Ok(slot.clone())
    }

    async fn set_occupancy(
        &self,
        slot_id: Uuid,
        state: Occupancy,
        actor: Uuid,
    ) -> ScheduleResult<ScheduleSlot> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(&slot_id)
            .filter(|s| !s.meta.deleted)
            .ok_or(ScheduleError::SlotNotFound)?;
        slot.occupancy = state;
        slot.meta.touch(actor);
        Ok(slot.clone())
    }

    async fn trash(&self, slot_id: Uuid, actor: Uuid) -> ScheduleResult<()> {
        let mut slots = self.slots.write();
        let slot = slots
            .get_mut(&slot_id)
            .filter(|s| !s.meta.deleted)
            .ok_or(ScheduleError::SlotNotFound)?;
        if slot.occupancy == Occupancy::Occupied {
            return Err(ScheduleError::SlotOccupied);
        }
        slot.meta.trash(actor);
        Ok(())
    }
}
