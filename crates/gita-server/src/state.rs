//! Application state.
//!
//! Shared state for all request handlers.

use std::collections::HashMap;
use std::path::PathBuf;

use gita_book::Library;

/// Title and keywords rendered into every page of a language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct PageSettings {
    pub(crate) title: String,
    pub(crate) keywords: String,
}

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Linked books per language.
    pub(crate) library: Library,
    /// Page settings keyed by language id.
    pub(crate) pages: HashMap<String, PageSettings>,
    /// Application version for cache invalidation.
    pub(crate) version: String,
    /// Directory served under `/public`.
    pub(crate) public_dir: PathBuf,
    /// File served as `/favicon.ico`.
    pub(crate) favicon: PathBuf,
}

impl AppState {
    /// Page settings for a language, empty when the language has none.
    #[must_use]
    pub(crate) fn page_settings(&self, language: &str) -> PageSettings {
        self.pages.get(language).cloned().unwrap_or_default()
    }
}
