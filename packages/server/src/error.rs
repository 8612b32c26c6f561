use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::MediaError;
use sea_orm::DbErr;
use serde::Serialize;

/// Error envelope returned by all endpoints on failure. Clients consume
/// the `message` string only; there are no machine-readable codes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable error description.
    #[schema(example = "Instruction not found")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    Forbidden,
    NotFound(String),
    UsernameTaken,
    /// Remote media upload failed. Carries the service message.
    Upload(String),
    /// Remote media deletion failed. Carries the service message.
    Deletion(String),
    Internal(String),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Insufficient permissions".to_string(),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                "Username is already taken".to_string(),
            ),
            AppError::Upload(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("File upload failed: {msg}"),
            ),
            AppError::Deletion(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Failed to delete the asset: {msg}"),
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Upload(msg) | MediaError::Payload(msg) => AppError::Upload(msg),
            MediaError::Deletion(msg) => AppError::Deletion(msg),
        }
    }
}
