//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value as JsonValue};

use super::error::ApiError;
use super::server::AppState;
use crate::models::form::fields;
use crate::models::RegistrationForm;
use crate::storage::AvatarUpload;

/// Registration body, read from `multipart/form-data` or `application/json`.
///
/// Multipart bodies carry text fields plus at most one `avatar` file part;
/// the file is read in chunks and abandoned as soon as it passes the
/// upload ceiling.
pub struct RegistrationSubmission(pub RegistrationForm);

impl FromRequest<Arc<AppState>> for RegistrationSubmission {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                ApiError::BadRequest {
                    message: e.body_text(),
                }
            })?;
            let limit = state.avatars.policy().max_bytes;
            return read_multipart(multipart, limit).await.map(Self);
        }

        if content_type.starts_with("application/json") {
            let Json(object) = Json::<Map<String, JsonValue>>::from_request(req, state)
                .await
                .map_err(|e| {
                    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                        ApiError::PayloadTooLarge {
                            limit: state.avatars.policy().max_bytes,
                        }
                    } else {
                        ApiError::BadRequest {
                            message: e.body_text(),
                        }
                    }
                })?;
            return Ok(Self(RegistrationForm::from_json_object(object)));
        }

        Err(ApiError::BadRequest {
            message: "expected a multipart/form-data or application/json body".into(),
        })
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    max_file_bytes: usize,
) -> Result<RegistrationForm, ApiError> {
    let mut form = RegistrationForm::default();
    let to_api = |e: MultipartError| multipart_error(e, max_file_bytes);

    while let Some(mut field) = multipart.next_field().await.map_err(to_api)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            let value = field.text().await.map_err(to_api)?;
            form.set_text(&name, value);
            continue;
        };

        // Only the first avatar file counts; other file parts are ignored
        if name != fields::AVATAR || form.avatar_file.is_some() {
            continue;
        }

        let content_type = field.content_type().map(str::to_owned);
        let mut bytes = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(to_api)? {
            if bytes.len() + chunk.len() > max_file_bytes {
                return Err(ApiError::PayloadTooLarge {
                    limit: max_file_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        // An untouched file input submits an empty, unnamed part
        if file_name.is_empty() && bytes.is_empty() {
            continue;
        }

        form.avatar_file = Some(AvatarUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    Ok(form)
}

fn multipart_error(e: MultipartError, max_file_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            limit: max_file_bytes,
        }
    } else {
        ApiError::BadRequest {
            message: e.body_text(),
        }
    }
}
