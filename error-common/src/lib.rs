//! Common error taxonomy for ClinicFlow Engine
//!
//! Every domain error in the engine carries a stable machine-readable code
//! and a localizable message key. The boundary layer maps error kinds to
//! transport-level responses; the core itself never retries a domain error.

pub mod codes;
pub mod types;

pub use types::*;
