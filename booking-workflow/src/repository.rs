use crate::{error::*, models::*};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

pub mod postgres;

/// Storage contract for bookings. Trashed bookings are invisible.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, booking: &Booking) -> BookingResult<Booking>;

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>>;

    async fn update(&self, booking: &Booking) -> BookingResult<Booking>;

    /// All non-deleted bookings owned by a card, oldest first.
    async fn for_card(&self, card_id: Uuid) -> BookingResult<Vec<Booking>>;

    async fn trash(&self, id: Uuid, actor: Uuid) -> BookingResult<()>;
}

/// In-memory booking repository for development and testing.
pub struct InMemoryBookingRepository {
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: &Booking) -> BookingResult<Booking> {
        let mut bookings = self.bookings.write();
        bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    async fn find(&self, id: Uuid) -> BookingResult<Option<Booking>> {
        let bookings = self.bookings.read();
        Ok(bookings.get(&id).filter(|b| !b.meta.deleted).cloned())
    }

    async fn update(&self, booking: &Booking) -> BookingResult<Booking> {
        let mut bookings = self.bookings.write();
        if !bookings
            .get(&booking.id)
            .is_some_and(|b| !b.meta.deleted)
        {
            return Err(BookingError::BookingNotFound);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(booking.clone())
    }

    async fn for_card(&self, card_id: Uuid) -> BookingResult<Vec<Booking>> {
        let bookings = self.bookings.read();
        let mut owned: Vec<Booking> = bookings
            .values()
            .filter(|b| !b.meta.deleted && b.card_id == card_id)
            .cloned()
            .collect();
        owned.sort_by_key(|b| b.meta.created_at);
        Ok(owned)
    }

    async fn trash(&self, id: Uuid, actor: Uuid) -> BookingResult<()> {
        let mut bookings = self.bookings.write();
        let booking = bookings
            .get_mut(&id)
            .filter(|b| !b.meta.deleted)
            .ok_or(BookingError::BookingNotFound)?;
        booking.meta.trash(actor);
        Ok(())
    }
}
