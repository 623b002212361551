//! Ledger for ClinicFlow Engine
//!
//! Tracks each patient's funded balance (the card) and the accumulating
//! partial payment attached to each booking. A charge is bounded twice:
//! by the card's available funds and by the item's price. The funds check,
//! the payment upsert, and the balance debit execute as one atomic unit at
//! the repository seam, so concurrent charges can neither drive a balance
//! negative nor push a payment past its price.

pub mod cards;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod settlement;

pub use cards::*;
pub use error::*;
pub use models::*;
pub use repository::*;
pub use service::*;
pub use settlement::*;
