use thiserror::Error;

/// Infrastructure failure in a storage backend.
///
/// These are fatal for the current request and propagate unchanged; only
/// domain errors are typed per component.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage backend error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
