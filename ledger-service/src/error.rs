use error_common::{codes, DomainError, ErrorKind};
use identity_access::IdentityError;
use storage_core::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Card not found")]
    CardNotFound,

    #[error("Card already exists")]
    CardAlreadyExists,

    #[error("Card is inactive")]
    CardInactive,

    #[error("Booking not found")]
    BookingNotFound,

    /// The funded balance does not cover the requested amount.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The charge would push the accumulated payment above the item price.
    #[error("Overpayment not allowed")]
    OverpaymentRejected,

    #[error("Booking is already fully paid")]
    AlreadyFullyPaid,

    #[error("Amount must not be negative")]
    InvalidAmount,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError for LedgerError {
    fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::CardNotFound => ErrorKind::NotFound,
            LedgerError::CardAlreadyExists => ErrorKind::Conflict,
            LedgerError::CardInactive => ErrorKind::Conflict,
            LedgerError::BookingNotFound => ErrorKind::NotFound,
            LedgerError::InsufficientFunds => ErrorKind::FundsInsufficient,
            LedgerError::OverpaymentRejected => ErrorKind::OverpaymentRejected,
            LedgerError::AlreadyFullyPaid => ErrorKind::Conflict,
            LedgerError::InvalidAmount => ErrorKind::ValidationFailed,
            LedgerError::Identity(e) => e.kind(),
            LedgerError::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            LedgerError::CardNotFound => codes::ledger::CARD_NOT_FOUND,
            LedgerError::CardAlreadyExists => codes::ledger::CARD_ALREADY_EXISTS,
            LedgerError::CardInactive => codes::ledger::CARD_INACTIVE,
            LedgerError::BookingNotFound => codes::booking::BOOKING_NOT_FOUND,
            LedgerError::InsufficientFunds => codes::ledger::INSUFFICIENT_FUNDS,
            LedgerError::OverpaymentRejected => codes::ledger::OVERPAYMENT_REJECTED,
            LedgerError::AlreadyFullyPaid => codes::ledger::ALREADY_FULLY_PAID,
            LedgerError::InvalidAmount => codes::ledger::INVALID_AMOUNT,
            LedgerError::Identity(e) => e.code(),
            LedgerError::Storage(_) => codes::storage::UNAVAILABLE,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            LedgerError::CardNotFound => "error.ledger.card_not_found",
            LedgerError::CardAlreadyExists => "error.ledger.card_already_exists",
            LedgerError::CardInactive => "error.ledger.card_inactive",
            LedgerError::BookingNotFound => "error.booking.booking_not_found",
            LedgerError::InsufficientFunds => "error.ledger.insufficient_funds",
            LedgerError::OverpaymentRejected => "error.ledger.overpayment_rejected",
            LedgerError::AlreadyFullyPaid => "error.ledger.already_fully_paid",
            LedgerError::InvalidAmount => "error.ledger.invalid_amount",
            LedgerError::Identity(e) => e.message_key(),
            LedgerError::Storage(_) => "error.storage.unavailable",
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
