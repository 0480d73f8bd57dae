//! Participant read endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{ListingFilter, Participant};

/// Query string for the listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
}

/// GET /api/listado - list or search participants
async fn list_participants(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Vec<Participant>>, ApiError> {
    let filter = ListingFilter::from_query(params.q.as_deref());
    let participants = state.store.list(&filter).await?;

    tracing::debug!(count = participants.len(), ?filter, "listed participants");
    Ok(Json(participants))
}

/// GET /api/participante/{id} - get a single participant
///
/// Identifiers that are not integers cannot exist, so they are a 404.
async fn get_participant(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Participant>, ApiError> {
    let id: i64 = id.trim().parse().map_err(|_| ApiError::NotFound {
        resource: "participant",
        id: id.clone(),
    })?;

    let participant = state.store.find_by_id(id).await?;
    Ok(Json(participant))
}

/// Participant read routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/listado", get(list_participants))
        .route("/api/participante/{id}", get(get_participant))
}
