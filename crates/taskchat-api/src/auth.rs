use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the verified caller identity, set by the fronting
/// identity proxy after credential validation. The value is trusted verbatim.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

impl CurrentUser {
    /// Reject access to another user's resources before any processing.
    pub fn authorize(&self, requested: Uuid, message: &str) -> Result<(), ApiError> {
        if self.user_id != requested {
            return Err(ApiError::Forbidden {
                message: message.to_string(),
                requested_user_id: requested,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or(ApiError::Unauthorized)?;
        let value = header.to_str().map_err(|_| ApiError::Unauthorized)?;
        let user_id = Uuid::parse_str(value).map_err(|_| ApiError::Unauthorized)?;

        Ok(CurrentUser { user_id })
    }
}
