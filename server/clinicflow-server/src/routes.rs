use axum::{
    routing::{get, post, put},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{bookings, health, ledger, schedule},
    openapi,
    server::ClinicServer,
};

/// Create health check routes
pub fn health_routes() -> Router<ClinicServer> {
    Router::new().route("/health", get(health::health_check))
}

/// Create schedule setup routes
pub fn schedule_routes() -> Router<ClinicServer> {
    Router::new().route("/schedule/slots", post(schedule::create_slot))
}

/// Create booking routes
pub fn booking_routes() -> Router<ClinicServer> {
    Router::new()
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:booking_id", put(bookings::update_booking))
        .route(
            "/patients/:patient_id/bookings",
            get(bookings::get_patient_bookings),
        )
}

/// Create ledger routes
pub fn ledger_routes() -> Router<ClinicServer> {
    Router::new()
        .route("/payments/charge", post(ledger::charge_payment))
        .route("/cards/top-up", post(ledger::top_up))
        .route(
            "/patients/:patient_id/payments",
            get(ledger::get_patient_payments),
        )
}

/// Assemble the application router.
pub fn create_app(server: ClinicServer) -> Router {
    let api = Router::new()
        .merge(schedule_routes())
        .merge(booking_routes())
        .merge(ledger_routes());

    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::api_doc()) }),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(server)
}
