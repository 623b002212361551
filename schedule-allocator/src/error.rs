use error_common::{codes, DomainError, ErrorKind};
use identity_access::IdentityError;
use storage_core::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// No free slot exists for the requested doctor and date.
    #[error("Schedule not available")]
    SlotUnavailable,

    /// A non-deleted slot already exists for the (doctor, date) pair.
    #[error("Day not available")]
    SlotAlreadyExists,

    #[error("Slot not found")]
    SlotNotFound,

    /// The slot is occupied and cannot be deleted.
    #[error("Slot is occupied")]
    SlotOccupied,

    #[error("Break window must lie within the working window")]
    InvalidTimeWindow,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError for ScheduleError {
    fn kind(&self) -> ErrorKind {
        match self {
            ScheduleError::SlotUnavailable => ErrorKind::Conflict,
            ScheduleError::SlotAlreadyExists => ErrorKind::Conflict,
            ScheduleError::SlotNotFound => ErrorKind::NotFound,
            ScheduleError::SlotOccupied => ErrorKind::Conflict,
            ScheduleError::InvalidTimeWindow => ErrorKind::ValidationFailed,
            ScheduleError::Identity(e) => e.kind(),
            ScheduleError::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ScheduleError::SlotUnavailable => codes::schedule::SLOT_UNAVAILABLE,
            ScheduleError::SlotAlreadyExists => codes::schedule::SLOT_ALREADY_EXISTS,
            ScheduleError::SlotNotFound => codes::schedule::SLOT_NOT_FOUND,
            ScheduleError::SlotOccupied => codes::schedule::SLOT_OCCUPIED,
            ScheduleError::InvalidTimeWindow => codes::schedule::INVALID_TIME_WINDOW,
            ScheduleError::Identity(e) => e.code(),
            ScheduleError::Storage(_) => codes::storage::UNAVAILABLE,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            ScheduleError::SlotUnavailable => "error.schedule.slot_unavailable",
            ScheduleError::SlotAlreadyExists => "error.schedule.slot_already_exists",
            ScheduleError::SlotNotFound => "error.schedule.slot_not_found",
            ScheduleError::SlotOccupied => "error.schedule.slot_occupied",
            ScheduleError::InvalidTimeWindow => "error.schedule.invalid_time_window",
            ScheduleError::Identity(e) => e.message_key(),
            ScheduleError::Storage(_) => "error.storage.unavailable",
        }
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
