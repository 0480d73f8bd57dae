//! Static file serving for /uploads/
//!
//! Stored avatars are served verbatim from the upload directory.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::ServeDir;

use crate::http::server::AppState;
use crate::storage::PUBLIC_PREFIX;

/// Create router for static file serving from the upload directory
pub fn router(upload_dir: &Path) -> Router<Arc<AppState>> {
    tracing::info!(path = %upload_dir.display(), "Serving avatars from {}/", PUBLIC_PREFIX);

    Router::new().nest_service(PUBLIC_PREFIX, ServeDir::new(upload_dir))
}
