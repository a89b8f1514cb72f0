//! Page routes.
//!
//! One handler per path shape. A first segment that names a configured
//! language selects that language's book; a bare number is bounds-checked
//! against the default language's book and redirected there.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Uri};
use axum::response::Response;
use gita_book::Book;

use crate::error::ServerError;
use crate::handlers::{
    chapter_url, html_page, parse_number, permanent_redirect, toc_url, verse_url,
};
use crate::state::AppState;
use crate::template::{self, NavLinks, PageHead};

/// Handle GET / (redirect to the default language).
pub(crate) async fn get_root(State(state): State<Arc<AppState>>) -> Response {
    permanent_redirect(toc_url(state.library.default_language()))
}

/// Handle GET /{language} and GET /{chapter}.
pub(crate) async fn get_one_segment(
    Path(first): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    if state.library.is_language(&first) {
        return toc_page(&state, &first, &headers);
    }

    let chapter = parse_number(&first).ok_or_else(|| unknown_path(&[&first]))?;
    let language = state.library.default_language();
    book(&state, language)?.chapter(chapter)?;
    Ok(permanent_redirect(chapter_url(language, chapter)))
}

/// Handle GET /{language}/{chapter} and GET /{chapter}/{verse}.
pub(crate) async fn get_two_segments(
    Path((first, second)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    if state.library.is_language(&first) {
        let chapter = parse_number(&second).ok_or_else(|| unknown_path(&[&first, &second]))?;
        return chapter_page(&state, &first, chapter, &headers);
    }

    let (Some(chapter), Some(verse)) = (parse_number(&first), parse_number(&second)) else {
        return Err(unknown_path(&[&first, &second]));
    };
    let language = state.library.default_language();
    book(&state, language)?.verse(chapter, verse)?;
    Ok(permanent_redirect(verse_url(language, chapter, verse)))
}

/// Handle GET /{language}/{chapter}/{verse}.
pub(crate) async fn get_verse_page(
    Path((language, chapter_segment, verse_segment)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let numbers = parse_number(&chapter_segment).zip(parse_number(&verse_segment));
    match numbers {
        Some((chapter, verse)) if state.library.is_language(&language) => {
            verse_page(&state, &language, chapter, verse, &headers)
        }
        _ => Err(unknown_path(&[&language, &chapter_segment, &verse_segment])),
    }
}

/// Fallback for paths matching no route.
pub(crate) async fn not_found(uri: Uri) -> ServerError {
    ServerError::UnknownPath(uri.path().to_owned())
}

fn toc_page(
    state: &AppState,
    language: &str,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let book = book(state, language)?;
    let settings = state.page_settings(language);
    let head = PageHead {
        language,
        title: &settings.title,
        keywords: &settings.keywords,
    };

    let body = template::render_toc(&head, book, |n| chapter_url(language, n));
    Ok(html_page(&state.version, headers, body))
}

fn chapter_page(
    state: &AppState,
    language: &str,
    number: u32,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let chapter = book(state, language)?.chapter(number)?;
    let settings = state.page_settings(language);
    let head = PageHead {
        language,
        title: &settings.title,
        keywords: &settings.keywords,
    };
    let nav = NavLinks {
        previous: chapter.previous().map(|c| chapter_url(language, c)),
        up: Some(toc_url(language)),
        next: chapter.next().map(|c| chapter_url(language, c)),
    };

    let body = template::render_chapter(&head, chapter, &nav, |v| {
        verse_url(language, chapter.number, v)
    });
    Ok(html_page(&state.version, headers, body))
}

fn verse_page(
    state: &AppState,
    language: &str,
    chapter: u32,
    verse: u32,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let chapter = book(state, language)?.chapter(chapter)?;
    let verse = chapter.verse(verse)?;
    let settings = state.page_settings(language);
    let head = PageHead {
        language,
        title: &settings.title,
        keywords: &settings.keywords,
    };
    let nav = NavLinks {
        previous: verse
            .previous_verse
            .get()
            .map(|r| verse_url(language, r.chapter, r.verse)),
        up: Some(chapter_url(language, chapter.number)),
        next: verse
            .next_verse
            .get()
            .map(|r| verse_url(language, r.chapter, r.verse)),
    };

    let body = template::render_verse(&head, chapter.number, verse, &nav);
    Ok(html_page(&state.version, headers, body))
}

fn book<'a>(state: &'a AppState, language: &str) -> Result<&'a Book, ServerError> {
    state
        .library
        .book(language)
        .map(|book| &**book)
        .ok_or_else(|| unknown_path(&[language]))
}

fn unknown_path(segments: &[&str]) -> ServerError {
    ServerError::UnknownPath(format!("/{}", segments.join("/")))
}
