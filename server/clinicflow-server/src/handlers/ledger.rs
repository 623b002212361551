use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::ClinicServer;
use ledger_service::PatientPayments;

/// Charge Payment Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChargePaymentRequest {
    pub booking_id: Uuid,
    #[schema(value_type = String)]
    pub amount: Decimal,
    /// Opaque payment method label
    pub method: String,
}

/// Top Up Request. The patient is the caller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TopUpRequest {
    #[schema(value_type = String)]
    pub amount: Decimal,
}

/// Balance Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    pub card_number: String,
    #[schema(value_type = String)]
    pub funded_balance: Decimal,
}

/// Apply a (possibly partial) payment to a booking
#[utoipa::path(
    post,
    path = "/api/v1/payments/charge",
    request_body = ChargePaymentRequest,
    responses(
        (status = 200, description = "Payment applied"),
        (status = 404, description = "Booking or card not found"),
        (status = 409, description = "Booking already fully paid"),
        (status = 422, description = "Insufficient funds or overpayment")
    ),
    tag = "ledger"
)]
pub async fn charge_payment(
    State(server): State<ClinicServer>,
    auth: AuthContext,
    Json(request): Json<ChargePaymentRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    server
        .ledger
        .charge_for_booking(request.booking_id, request.amount, request.method, auth.user_id)
        .await?;
    Ok(Json(api_success(serde_json::json!({}))))
}

/// Add funds to the caller's card
#[utoipa::path(
    post,
    path = "/api/v1/cards/top-up",
    request_body = TopUpRequest,
    responses(
        (status = 200, description = "Balance updated", body = BalanceResponse),
        (status = 400, description = "Negative amount")
    ),
    tag = "ledger"
)]
pub async fn top_up(
    State(server): State<ClinicServer>,
    auth: AuthContext,
    Json(request): Json<TopUpRequest>,
) -> Result<Json<ApiResponse<BalanceResponse>>, ApiError> {
    let card = server
        .ledger
        .top_up(auth.user_id, request.amount, auth.user_id)
        .await?;
    Ok(Json(api_success(BalanceResponse {
        card_number: card.card_number,
        funded_balance: card.funded_balance,
    })))
}

/// A patient's payments with the total paid
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/payments",
    params(
        ("patient_id" = Uuid, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Payment lines and total paid"),
        (status = 404, description = "Patient or card not found")
    ),
    tag = "ledger"
)]
pub async fn get_patient_payments(
    State(server): State<ClinicServer>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PatientPayments>>, ApiError> {
    let detail = server.ledger.detail_for_patient(patient_id).await?;
    Ok(Json(api_success(detail)))
}
