use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage_core::RecordMeta;
use uuid::Uuid;

/// Card status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Active,
    Inactive,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardStatus::Active => "active",
            CardStatus::Inactive => "inactive",
        }
    }
}

/// A patient's funded-balance account. Exactly one non-deleted card exists
/// per patient; the card number is unique among non-deleted cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub card_number: String,
    pub funded_balance: Decimal,
    pub status: CardStatus,
    pub meta: RecordMeta,
}

impl Card {
    pub fn new(patient_id: Uuid, card_number: String, actor: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            card_number,
            funded_balance: Decimal::ZERO,
            status: CardStatus::Active,
            meta: RecordMeta::new(actor),
        }
    }
}

/// Payment status. `Paid` iff the accumulated amount equals the item price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    NotPaid,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::NotPaid => "not_paid",
            PaymentStatus::Paid => "paid",
        }
    }
}

/// The accumulating partial-payment entry for one booking. At most one
/// record exists per booking, enforced at the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub card_id: Uuid,
    pub amount_paid: Decimal,
    /// Opaque label; no gateway semantics attach to it.
    pub method: String,
    pub status: PaymentStatus,
    pub meta: RecordMeta,
}

/// What a charge applies to: resolved from a booking by the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeTarget {
    pub booking_id: Uuid,
    pub card_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub price: Decimal,
}

/// One charge to apply atomically against a card and its booking payment.
#[derive(Debug, Clone)]
pub struct Settlement {
    pub card_id: Uuid,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub method: String,
    /// Price ceiling of the booked item.
    pub price: Decimal,
    pub actor: Uuid,
}

/// One line of a patient's payment detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLine {
    pub booking_id: Uuid,
    pub item_name: String,
    pub amount_paid: Decimal,
    pub status: PaymentStatus,
    pub paid_on: DateTime<Utc>,
}

/// Payment detail for one patient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPayments {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub payments: Vec<PaymentLine>,
    pub total_paid: Decimal,
}
