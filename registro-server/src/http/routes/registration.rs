//! Registration endpoint

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::http::error::ApiError;
use crate::http::extractors::RegistrationSubmission;
use crate::http::server::AppState;
use crate::models::Participant;

/// Body limit for registrations: room for a maximum-size avatar plus the
/// text fields and multipart framing.
pub const REGISTRATION_BODY_LIMIT: usize = 8 * 1024 * 1024;

/// POST /api/registro - register a participant
async fn register(
    State(state): State<Arc<AppState>>,
    RegistrationSubmission(form): RegistrationSubmission,
) -> Result<(StatusCode, Json<Participant>), ApiError> {
    let participant = state.registrar.register(form).await.map_err(|e| {
        tracing::info!(error = %e, "registration rejected");
        ApiError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(participant)))
}

/// Registration routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/registro", post(register))
        .layer(DefaultBodyLimit::max(REGISTRATION_BODY_LIMIT))
}
