//! ClinicFlow Engine HTTP server
//!
//! Thin boundary over the booking and ledger engine: extracts the caller
//! identity, converts payloads, and maps domain errors to transport
//! responses. All invariants live in the engine crates.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;

pub use error::{api_success, ApiError, ApiResponse, ApiResult};
pub use routes::create_app;
pub use server::{ClinicServer, ServerConfig};
