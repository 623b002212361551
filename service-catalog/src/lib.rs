//! Catalog item contract for ClinicFlow Engine
//!
//! The clinic service catalog (CRUD, text search, pricing maintenance) is
//! managed outside this engine. The booking and ledger core consumes it
//! read-only through [`ServiceCatalog`]: an item resolves to its price and
//! expected duration, nothing more.

pub mod catalog;
pub mod error;
pub mod models;

pub use catalog::*;
pub use error::*;
pub use models::*;
