use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use taskchat_persist::PersistError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    Forbidden {
        message: String,
        requested_user_id: Uuid,
    },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Forbidden {
                message,
                requested_user_id,
            } => {
                let body = Json(json!({
                    "code": "FORBIDDEN",
                    "message": message,
                    "details": { "requested_user_id": requested_user_id },
                }));
                (StatusCode::FORBIDDEN, body).into_response()
            }
            ApiError::Unauthorized => {
                let body = Json(json!({
                    "code": "UNAUTHORIZED",
                    "message": "Authentication required",
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            }
            ApiError::BadRequest(_) => {
                let body = Json(json!({ "error": self.to_string() }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Persist(ref e @ PersistError::TaskNotFound(_)) => {
                let body = Json(json!({ "error": e.to_string() }));
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Persist(ref e @ PersistError::Validation(_)) => {
                let body = Json(json!({ "error": e.to_string() }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                let body = Json(json!({ "error": "Storage error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
