//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Internal failures are logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::models::FieldErrors;
use crate::registration::RegistrationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// One or more fields failed validation (400)
    InvalidFields(FieldErrors),

    /// Neither an avatar file nor an avatar URL was supplied (400)
    MissingAvatar,

    /// Terms were not accepted (400)
    ConsentRequired,

    /// Avatar media type not on the allow-list (400)
    UnsupportedMediaType { content_type: String },

    /// Avatar larger than the upload ceiling (400)
    PayloadTooLarge { limit: usize },

    /// Body could not be read as a registration (400)
    BadRequest { message: String },

    /// Email already registered (409)
    DuplicateEmail,

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidFields(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "invalid_fields",
                    "message": "invalid registration fields",
                    "details": errors
                }),
            ),
            Self::MissingAvatar => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "missing_avatar",
                    "message": "an avatar image or URL is required"
                }),
            ),
            Self::ConsentRequired => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "consent_required",
                    "message": "terms must be accepted"
                }),
            ),
            Self::UnsupportedMediaType { content_type } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "unsupported_media_type",
                    "message": format!("file type '{}' is not allowed", content_type)
                }),
            ),
            Self::PayloadTooLarge { limit } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "payload_too_large",
                    "message": format!("file exceeds maximum size of {} bytes", limit)
                }),
            ),
            Self::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "bad_request",
                    "message": message
                }),
            ),
            Self::DuplicateEmail => (
                StatusCode::CONFLICT,
                json!({
                    "error": "duplicate_email",
                    "message": "email already registered"
                }),
            ),
            Self::NotFound { resource, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", resource, id)
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::DuplicateEmail { .. } => Self::DuplicateEmail,
            _ => Self::Database(e),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::InvalidFields(errors) => Self::InvalidFields(errors),
            RegistrationError::MissingAvatar => Self::MissingAvatar,
            RegistrationError::ConsentRequired => Self::ConsentRequired,
            RegistrationError::UnsupportedMediaType { content_type } => {
                Self::UnsupportedMediaType { content_type }
            }
            RegistrationError::PayloadTooLarge { limit } => Self::PayloadTooLarge { limit },
            RegistrationError::DuplicateEmail => Self::DuplicateEmail,
            RegistrationError::Persistence(e) => Self::from(e),
            RegistrationError::Storage(e) => Self::Internal {
                message: format!("avatar storage failed: {}", e),
            },
        }
    }
}
