//! HTTP request handlers.

pub(crate) mod pages;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use md5::{Digest, Md5};

/// Parse a chapter or verse segment: one or two ASCII digits.
///
/// `"01"` and `"1"` name the same number.
pub(crate) fn parse_number(segment: &str) -> Option<u32> {
    if segment.is_empty() || segment.len() > 2 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// URL of a language's table of contents.
pub(crate) fn toc_url(language: &str) -> String {
    format!("/{language}")
}

/// URL of a chapter page.
pub(crate) fn chapter_url(language: &str, chapter: u32) -> String {
    format!("/{language}/{chapter}")
}

/// URL of a verse page.
pub(crate) fn verse_url(language: &str, chapter: u32, verse: u32) -> String {
    format!("/{language}/{chapter}/{verse}")
}

/// `301 Moved Permanently` to `location`.
pub(crate) fn permanent_redirect(location: String) -> Response {
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

/// HTML page response with `ETag` and `Cache-Control`.
///
/// Answers `304 Not Modified` when `If-None-Match` carries the same tag.
pub(crate) fn html_page(version: &str, headers: &HeaderMap, body: String) -> Response {
    let etag = compute_etag(version, &body);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    (
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        Html(body),
    )
        .into_response()
}

/// Compute `ETag` from version and content.
///
/// MD5 hash truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
