use error_common::{codes, DomainError, ErrorKind};
use storage_core::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog item not found")]
    ItemNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DomainError for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::ItemNotFound => ErrorKind::NotFound,
            CatalogError::Storage(_) => ErrorKind::Storage,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            CatalogError::ItemNotFound => codes::catalog::ITEM_NOT_FOUND,
            CatalogError::Storage(_) => codes::storage::UNAVAILABLE,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            CatalogError::ItemNotFound => "error.catalog.item_not_found",
            CatalogError::Storage(_) => "error.storage.unavailable",
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
