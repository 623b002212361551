use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_catalog::CatalogItem;
use storage_core::RecordMeta;
use uuid::Uuid;

/// Booking lifecycle state. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    InProcess,
    Done,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::InProcess => "in_process",
            BookingStatus::Done => "done",
        }
    }
}

/// A patient's reservation of one catalog item with one doctor.
///
/// The booking references the slot's doctor, not the slot instance; the
/// (doctor, from_date) pair is re-resolved whenever the slot is needed.
/// `to_date` stays unset until the booking closes and, once set, never
/// precedes `from_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub card_id: Uuid,
    pub item_id: Uuid,
    pub doctor_id: Uuid,
    pub from_date: DateTime<Utc>,
    pub expected_completion: DateTime<Utc>,
    pub to_date: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub meta: RecordMeta,
}

impl Booking {
    pub fn new(
        card_id: Uuid,
        item: &CatalogItem,
        doctor_id: Uuid,
        from_date: DateTime<Utc>,
        actor: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            item_id: item.id,
            doctor_id,
            from_date,
            expected_completion: from_date + Duration::days(item.duration_days),
            to_date: None,
            status: BookingStatus::InProcess,
            meta: RecordMeta::new(actor),
        }
    }
}

/// Partial update to a booking. Setting `to_date` closes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingPatch {
    pub from_date: Option<DateTime<Utc>>,
    pub item_id: Option<Uuid>,
    pub to_date: Option<DateTime<Utc>>,
}

/// One booking line in a patient's overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingLine {
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub from_date: DateTime<Utc>,
    pub expected_completion: DateTime<Utc>,
    pub to_date: Option<DateTime<Utc>>,
    pub status: BookingStatus,
    pub amount_paid: Decimal,
}

/// A patient's card with all of its visible bookings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientOverview {
    pub patient_id: Uuid,
    pub card_number: String,
    pub funded_balance: Decimal,
    pub bookings: Vec<BookingLine>,
}
