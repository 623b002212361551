use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use booking_workflow::BookingError;
use error_common::{log_domain_error, DomainError, ErrorKind};
use identity_access::IdentityError;
use ledger_service::LedgerError;
use schedule_allocator::ScheduleError;
use serde::{Deserialize, Serialize};
use service_catalog::CatalogError;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Stable machine-readable error code
    pub code: String,
    /// Coarse error classification
    pub kind: String,
    /// Human-readable error message
    pub message: String,
    /// Key a client resolves to a localized message
    pub message_key: String,
    /// Timestamp when the error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    /// A typed domain error surfaced by the engine.
    #[error("{message}")]
    Domain {
        kind: ErrorKind,
        code: &'static str,
        message_key: &'static str,
        message: String,
    },

    #[error("Authentication error: {message}")]
    Authentication { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn domain(error: &dyn DomainError) -> Self {
        log_domain_error("api", error);
        Self::Domain {
            kind: error.kind(),
            code: error.code(),
            message_key: error.message_key(),
            message: error.to_string(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain { kind, .. } => match kind {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
                ErrorKind::FundsInsufficient => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::OverpaymentRejected => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::Storage => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::Authentication { .. } => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Domain { code, .. } => code,
            ApiError::Authentication { .. } => "AUTH_0001",
            ApiError::BadRequest { .. } => "REQUEST_0001",
            ApiError::Internal { .. } => "INTERNAL_0001",
        }
    }

    fn kind_label(&self) -> String {
        match self {
            ApiError::Domain { kind, .. } => format!("{kind:?}"),
            ApiError::Authentication { .. } => "Authentication".to_string(),
            ApiError::BadRequest { .. } => "BadRequest".to_string(),
            ApiError::Internal { .. } => "Internal".to_string(),
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            ApiError::Domain { message_key, .. } => message_key,
            ApiError::Authentication { .. } => "error.auth.unauthenticated",
            ApiError::BadRequest { .. } => "error.request.invalid",
            ApiError::Internal { .. } => "error.internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        tracing::error!(
            error_id = %error_id,
            code = %self.code(),
            status_code = %status_code.as_u16(),
            error = %self,
            "API error occurred"
        );

        let error_response = ApiErrorResponse {
            error_id,
            code: self.code().to_string(),
            kind: self.kind_label(),
            message: self.to_string(),
            message_key: self.message_key().to_string(),
            timestamp: chrono::Utc::now(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<ScheduleError> for ApiError {
    fn from(error: ScheduleError) -> Self {
        ApiError::domain(&error)
    }
}

impl From<BookingError> for ApiError {
    fn from(error: BookingError) -> Self {
        ApiError::domain(&error)
    }
}

impl From<LedgerError> for ApiError {
    fn from(error: LedgerError) -> Self {
        ApiError::domain(&error)
    }
}

impl From<IdentityError> for ApiError {
    fn from(error: IdentityError) -> Self {
        ApiError::domain(&error)
    }
}

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        ApiError::domain(&error)
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
