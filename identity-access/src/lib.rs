//! Identity lookup contract for ClinicFlow Engine
//!
//! Authentication and credential management live outside this engine; the
//! booking and ledger core only needs to resolve a user id to an account
//! and its role. [`IdentityDirectory`] is that narrow contract, with an
//! in-memory directory for development and testing.

pub mod directory;
pub mod error;
pub mod models;

pub use directory::*;
pub use error::*;
pub use models::*;
