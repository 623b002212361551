use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storage_core::RecordMeta;
use uuid::Uuid;

/// A purchasable clinic service.
///
/// `duration_days` is the expected number of days between a booking's start
/// and its completion; `price` is the payment ceiling for the booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub duration_days: i64,
    pub meta: RecordMeta,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, price: Decimal, duration_days: i64, actor: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            duration_days,
            meta: RecordMeta::new(actor),
        }
    }
}
