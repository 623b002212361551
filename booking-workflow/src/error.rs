use error_common::{codes, DomainError, ErrorKind};
use identity_access::IdentityError;
use ledger_service::LedgerError;
use schedule_allocator::ScheduleError;
use service_catalog::CatalogError;
use storage_core::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Booking not found")]
    BookingNotFound,

    /// Closing date precedes the booking's start date.
    #[error("Completion date must not precede the start date")]
    InvalidDateRange,

    /// The booking is already closed; `Done` is terminal.
    #[error("Booking is already closed")]
    BookingClosed,

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError for BookingError {
    fn kind(&self) -> ErrorKind {
        match self {
            BookingError::BookingNotFound => ErrorKind::NotFound,
            BookingError::InvalidDateRange => ErrorKind::ValidationFailed,
            BookingError::BookingClosed => ErrorKind::Conflict,
            BookingError::Schedule(e) => e.kind(),
            BookingError::Catalog(e) => e.kind(),
            BookingError::Ledger(e) => e.kind(),
            BookingError::Identity(e) => e.kind(),
            BookingError::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            BookingError::BookingNotFound => codes::booking::BOOKING_NOT_FOUND,
            BookingError::InvalidDateRange => codes::booking::INVALID_DATE_RANGE,
            BookingError::BookingClosed => codes::booking::BOOKING_CLOSED,
            BookingError::Schedule(e) => e.code(),
            BookingError::Catalog(e) => e.code(),
            BookingError::Ledger(e) => e.code(),
            BookingError::Identity(e) => e.code(),
            BookingError::Storage(_) => codes::storage::UNAVAILABLE,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            BookingError::BookingNotFound => "error.booking.booking_not_found",
            BookingError::InvalidDateRange => "error.booking.invalid_date_range",
            BookingError::BookingClosed => "error.booking.booking_closed",
            BookingError::Schedule(e) => e.message_key(),
            BookingError::Catalog(e) => e.message_key(),
            BookingError::Ledger(e) => e.message_key(),
            BookingError::Identity(e) => e.message_key(),
            BookingError::Storage(_) => "error.storage.unavailable",
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
