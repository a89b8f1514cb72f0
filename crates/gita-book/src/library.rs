//! Per-language books.
//!
//! Every configured language maps to a linked, immutable [`Book`]. A language
//! without its own dataset shares the default language's book. Each dataset
//! path is loaded once, even when several languages name it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::book::Book;
use crate::loader::LoadError;

/// A language and the dataset it is served from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSource {
    /// Language id used in URLs (e.g. "lt").
    pub id: String,
    /// Dataset path, `None` to share the default language's book.
    pub dataset: Option<PathBuf>,
}

/// Error returned when the library cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// Default language is not among the configured languages.
    #[error("Default language '{0}' is not configured")]
    UnknownDefaultLanguage(String),
    /// Default language has no dataset of its own.
    #[error("Default language '{0}' has no dataset")]
    MissingDefaultDataset(String),
    /// A dataset failed to load.
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Immutable set of books keyed by language id.
#[derive(Clone, Debug)]
pub struct Library {
    books: HashMap<String, Arc<Book>>,
    /// Language ids in configuration order.
    languages: Vec<String>,
    default_language: String,
}

impl Library {
    /// Load every dataset and build the library.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the default language is missing or has no
    /// dataset, or if any dataset fails to load.
    pub fn load(sources: &[LanguageSource], default_language: &str) -> Result<Self, LibraryError> {
        Self::build(sources, default_language, |path| {
            Book::load(path).map(Arc::new)
        })
    }

    /// Build a library using `load` to read each distinct dataset path.
    fn build<F>(
        sources: &[LanguageSource],
        default_language: &str,
        mut load: F,
    ) -> Result<Self, LibraryError>
    where
        F: FnMut(&Path) -> Result<Arc<Book>, LoadError>,
    {
        let default_source = sources
            .iter()
            .find(|s| s.id == default_language)
            .ok_or_else(|| LibraryError::UnknownDefaultLanguage(default_language.to_owned()))?;
        let default_dataset = default_source
            .dataset
            .as_ref()
            .ok_or_else(|| LibraryError::MissingDefaultDataset(default_language.to_owned()))?;

        let mut loaded: HashMap<PathBuf, Arc<Book>> = HashMap::new();
        let mut books = HashMap::with_capacity(sources.len());

        for source in sources {
            let path = source.dataset.as_ref().unwrap_or(default_dataset);
            let book = match loaded.get(path) {
                Some(book) => Arc::clone(book),
                None => {
                    let book = load(path.as_path())?;
                    loaded.insert(path.clone(), Arc::clone(&book));
                    book
                }
            };
            tracing::info!(
                language = %source.id,
                dataset = %path.display(),
                shared = source.dataset.is_none(),
                "Registered language"
            );
            books.insert(source.id.clone(), book);
        }

        Ok(Self {
            books,
            languages: sources.iter().map(|s| s.id.clone()).collect(),
            default_language: default_language.to_owned(),
        })
    }

    /// Build a library serving one in-memory book under every language.
    #[must_use]
    pub fn with_book(book: Book, languages: &[&str], default_language: &str) -> Self {
        let book = Arc::new(book);
        Self {
            books: languages
                .iter()
                .map(|id| ((*id).to_owned(), Arc::clone(&book)))
                .collect(),
            languages: languages.iter().map(|id| (*id).to_owned()).collect(),
            default_language: default_language.to_owned(),
        }
    }

    /// Book for a language, `None` for an unknown language.
    #[must_use]
    pub fn book(&self, language: &str) -> Option<&Arc<Book>> {
        self.books.get(language)
    }

    /// Book for the default language.
    #[must_use]
    pub fn default_book(&self) -> Option<&Arc<Book>> {
        self.book(&self.default_language)
    }

    /// Whether `id` is a configured language.
    #[must_use]
    pub fn is_language(&self, id: &str) -> bool {
        self.books.contains_key(id)
    }

    /// Configured language ids, in configuration order.
    #[must_use]
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Default language id.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}
