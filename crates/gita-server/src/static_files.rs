//! Static file serving.
//!
//! `/public/*` is served from the public directory and `/favicon.ico` from
//! the configured favicon file, both through `tower-http`.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Create router for static files.
pub(crate) fn static_router(public_dir: &Path, favicon: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .nest_service("/public", ServeDir::new(public_dir))
        .route_service("/favicon.ico", ServeFile::new(favicon))
}
