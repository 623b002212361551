use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use storage_core::RecordMeta;
use uuid::Uuid;

/// Occupancy state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    Free,
    Occupied,
}

impl Occupancy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occupancy::Free => "free",
            Occupancy::Occupied => "occupied",
        }
    }
}

/// A doctor's single bookable unit of capacity for one calendar day.
///
/// The break window must lie inside the working window:
/// `start_time ≤ break_start ≤ break_end ≤ finish_time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub finish_time: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
    pub occupancy: Occupancy,
    pub meta: RecordMeta,
}

/// Parameters for setting up a new slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSlot {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub finish_time: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
}

impl NewSlot {
    /// The break window must fit inside the working window.
    pub fn time_window_valid(&self) -> bool {
        self.start_time <= self.break_start
            && self.break_start <= self.break_end
            && self.break_end <= self.finish_time
    }

    pub fn into_slot(self, actor: Uuid) -> ScheduleSlot {
        ScheduleSlot {
            id: Uuid::new_v4(),
            doctor_id: self.doctor_id,
            date: self.date,
            start_time: self.start_time,
            finish_time: self.finish_time,
            break_start: self.break_start,
            break_end: self.break_end,
            occupancy: Occupancy::Free,
            meta: RecordMeta::new(actor),
        }
    }
}
