use utoipa::OpenApi;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,

        // Schedule endpoints
        crate::handlers::schedule::create_slot,

        // Booking endpoints
        crate::handlers::bookings::create_booking,
        crate::handlers::bookings::update_booking,
        crate::handlers::bookings::get_patient_bookings,

        // Ledger endpoints
        crate::handlers::ledger::charge_payment,
        crate::handlers::ledger::top_up,
        crate::handlers::ledger::get_patient_payments,
    ),
    components(
        schemas(
            crate::handlers::health::HealthResponse,
            crate::handlers::schedule::CreateSlotRequest,
            crate::handlers::schedule::CreateSlotResponse,
            crate::handlers::bookings::CreateBookingRequest,
            crate::handlers::bookings::CreateBookingResponse,
            crate::handlers::bookings::UpdateBookingRequest,
            crate::handlers::ledger::ChargePaymentRequest,
            crate::handlers::ledger::TopUpRequest,
            crate::handlers::ledger::BalanceResponse,
            crate::error::ApiErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "System health endpoints"),
        (name = "schedule", description = "Doctor slot setup"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "ledger", description = "Balances and payments"),
    ),
    info(
        title = "ClinicFlow Engine API",
        version = "0.1.0",
        description = "Patient-doctor booking and payment ledger engine.",
        contact(
            name = "ClinicFlow Team",
            email = "team@clinicflow.dev",
            url = "https://clinicflow.dev"
        ),
    )
)]
pub struct ApiDoc;

/// The rendered OpenAPI document.
pub fn api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
