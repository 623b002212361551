//! Schedule Allocator for ClinicFlow Engine
//!
//! Owns a doctor's set of daily time-slots and their occupancy state. A
//! doctor has at most one bookable unit of time per calendar day: slot
//! lookup keys on the date alone, not on a time range. Reserving a slot is
//! a compare-and-set from `Free` to `Occupied`, so two concurrent booking
//! attempts for the same (doctor, date) cannot both succeed.

pub mod allocator;
pub mod error;
pub mod models;
pub mod repository;

pub use allocator::*;
pub use error::*;
pub use models::*;
pub use repository::*;
