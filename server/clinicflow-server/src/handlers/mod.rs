pub mod bookings;
pub mod health;
pub mod ledger;
pub mod schedule;
