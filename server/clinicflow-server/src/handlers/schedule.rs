use axum::{extract::State, Json};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{api_success, ApiError, ApiResponse};
use crate::middleware::AuthContext;
use crate::server::ClinicServer;
use schedule_allocator::NewSlot;

/// Create Slot Request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSlotRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub finish_time: NaiveTime,
    pub break_start: NaiveTime,
    pub break_end: NaiveTime,
}

/// Create Slot Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSlotResponse {
    pub slot_id: Uuid,
}

/// Set up a doctor's slot for one calendar day
#[utoipa::path(
    post,
    path = "/api/v1/schedule/slots",
    request_body = CreateSlotRequest,
    responses(
        (status = 200, description = "Slot created", body = CreateSlotResponse),
        (status = 400, description = "Invalid time window"),
        (status = 403, description = "Referenced identity is not a doctor"),
        (status = 409, description = "Doctor already has a slot for that day")
    ),
    tag = "schedule"
)]
pub async fn create_slot(
    State(server): State<ClinicServer>,
    auth: AuthContext,
    Json(request): Json<CreateSlotRequest>,
) -> Result<Json<ApiResponse<CreateSlotResponse>>, ApiError> {
    let slot = server
        .allocator
        .create_slot(
            NewSlot {
                doctor_id: request.doctor_id,
                date: request.date,
                start_time: request.start_time,
                finish_time: request.finish_time,
                break_start: request.break_start,
                break_end: request.break_end,
            },
            auth.user_id,
        )
        .await?;

    Ok(Json(api_success(CreateSlotResponse { slot_id: slot.id })))
}
