use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::ClinicServer;
use booking_workflow::{BookingPatch, PatientOverview};

/// Create Booking Request. The patient is the caller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub doctor_id: Uuid,
    /// Booking start, epoch milliseconds
    pub from_date: i64,
}

/// Create Booking Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingResponse {
    pub booking_id: Uuid,
}

/// Update Booking Request. Setting `to_date` closes the booking.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    /// New booking start, epoch milliseconds
    pub from_date: Option<i64>,
    pub item_id: Option<Uuid>,
    /// Completion date, epoch milliseconds
    pub to_date: Option<i64>,
}

fn from_epoch_millis(millis: i64, field: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ApiError::bad_request(format!("{field} is not a valid timestamp")))
}

/// Book an item with a doctor
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = CreateBookingResponse),
        (status = 403, description = "Referenced identity is not a doctor"),
        (status = 409, description = "No free slot for that doctor and day")
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    State(server): State<ClinicServer>,
    auth: AuthContext,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<CreateBookingResponse>>, ApiError> {
    let from_date = from_epoch_millis(request.from_date, "from_date")?;

    let booking = server
        .bookings
        .create(
            auth.user_id,
            request.item_id,
            request.doctor_id,
            from_date,
            auth.user_id,
        )
        .await?;

    Ok(Json(api_success(CreateBookingResponse {
        booking_id: booking.id,
    })))
}

/// Edit or close a booking
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{booking_id}",
    params(
        ("booking_id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated"),
        (status = 400, description = "Completion date precedes the start date"),
        (status = 403, description = "Caller is neither the assigned doctor nor a director"),
        (status = 404, description = "Booking not found")
    ),
    tag = "bookings"
)]
pub async fn update_booking(
    State(server): State<ClinicServer>,
    auth: AuthContext,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<UpdateBookingRequest>,
) -> Result<Json<ApiResponse<CreateBookingResponse>>, ApiError> {
    let patch = BookingPatch {
        from_date: request
            .from_date
            .map(|m| from_epoch_millis(m, "from_date"))
            .transpose()?,
        item_id: request.item_id,
        to_date: request
            .to_date
            .map(|m| from_epoch_millis(m, "to_date"))
            .transpose()?,
    };

    let booking = server
        .bookings
        .update(booking_id, auth.actor(), patch)
        .await?;

    Ok(Json(api_success(CreateBookingResponse {
        booking_id: booking.id,
    })))
}

/// A patient's card and bookings
#[utoipa::path(
    get,
    path = "/api/v1/patients/{patient_id}/bookings",
    params(
        ("patient_id" = Uuid, Path, description = "Patient ID")
    ),
    responses(
        (status = 200, description = "Card number, funded balance, and bookings"),
        (status = 404, description = "Patient or card not found")
    ),
    tag = "bookings"
)]
pub async fn get_patient_bookings(
    State(server): State<ClinicServer>,
    _auth: AuthContext,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<ApiResponse<PatientOverview>>, ApiError> {
    let overview = server.bookings.patient_overview(patient_id).await?;
    Ok(Json(api_success(overview)))
}
