use error_common::{codes, DomainError, ErrorKind};
use storage_core::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("User not found")]
    UserNotFound,

    #[error("Access denied")]
    AccessDenied,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError for IdentityError {
    fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::UserNotFound => ErrorKind::NotFound,
            IdentityError::AccessDenied => ErrorKind::PermissionDenied,
            IdentityError::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            IdentityError::UserNotFound => codes::identity::USER_NOT_FOUND,
            IdentityError::AccessDenied => codes::identity::ACCESS_DENIED,
            IdentityError::Storage(_) => codes::storage::UNAVAILABLE,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            IdentityError::UserNotFound => "error.identity.user_not_found",
            IdentityError::AccessDenied => "error.identity.access_denied",
            IdentityError::Storage(_) => "error.storage.unavailable",
        }
    }
}

pub type IdentityResult<T> = Result<T, IdentityError>;
