//! Booking Workflow for ClinicFlow Engine
//!
//! Orchestrates the lifecycle of a booking — one patient, one catalog item,
//! one doctor — from creation through completion:
//!
//! ```text
//! [start] --create--> IN_PROCESS --close(to_date set)--> DONE [terminal]
//! ```
//!
//! Creation spans the patient's card, the schedule allocator, and the
//! catalog as one unit: the slot reservation is the atomic commit point,
//! and a persistence failure after it releases the slot again. Closure
//! re-resolves the slot from the booking's (doctor, from_date) pair and
//! frees it.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::*;
pub use models::*;
pub use repository::*;
pub use service::*;
