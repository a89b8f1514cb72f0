//! Error types for request handling.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use gita_book::LookupError;

use crate::template;

/// Per-request error, always answered with a 404 page.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Chapter or verse number out of range.
    #[error(transparent)]
    NotFound(#[from] LookupError),

    /// Path matches no route shape (unknown language, non-numeric segment).
    #[error("Page not found: {0}")]
    UnknownPath(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound(e) => tracing::debug!(error = %e, "Lookup failed"),
            Self::UnknownPath(path) => tracing::debug!(path = %path, "Unknown path"),
        }

        let body = match &self {
            Self::NotFound(e) => template::render_message(&e.to_string()),
            Self::UnknownPath(_) => template::render_message("Page not found"),
        };

        (StatusCode::NOT_FOUND, Html(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[tokio::test]
    async fn test_not_found_renders_lookup_message() {
        let response = ServerError::from(LookupError::ChapterNotFound(19)).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Chapter 19 does not exist!"));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = ServerError::UnknownPath("/xx/yy".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
