//! Caller identity extraction
//!
//! Credential validation happens upstream of this engine; requests arrive
//! with the already-authenticated user id in the `x-user-id` header. The
//! extractor resolves it through the identity directory so handlers get a
//! verified account and role.

use crate::error::ApiError;
use crate::server::ClinicServer;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use identity_access::{Actor, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const USER_ID_HEADER: &str = "x-user-id";

/// Authenticated caller of the current request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

#[async_trait]
impl FromRequestParts<ClinicServer> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ClinicServer,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::authentication("Missing x-user-id header"))?;

        let user_id = Uuid::parse_str(header)
            .map_err(|_| ApiError::authentication("Invalid x-user-id header"))?;

        let account = state
            .directory
            .resolve_user(user_id)
            .await
            .map_err(|_| ApiError::authentication("Unknown caller identity"))?;
        if !account.active {
            return Err(ApiError::authentication("Account is disabled"));
        }

        Ok(AuthContext {
            user_id: account.id,
            role: account.role,
        })
    }
}
