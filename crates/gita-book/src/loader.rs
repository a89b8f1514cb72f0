//! Dataset loading.
//!
//! A dataset is a single JSON document holding the whole book. Loading is a
//! startup precondition: any failure here means the server must not start.

use std::path::{Path, PathBuf};

use crate::book::Book;
use crate::linker::link;

/// Number of chapters every dataset must contain.
pub const BOOK_CHAPTER_COUNT: usize = 18;

/// Error returned when a dataset cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Dataset file could not be read.
    #[error("Failed to read dataset {}: {source}", .path.display())]
    Io {
        /// Dataset path.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Dataset is not valid JSON or has the wrong shape.
    #[error("Failed to parse dataset {}: {source}", .path.display())]
    Parse {
        /// Dataset path.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Dataset does not contain the expected number of chapters.
    #[error(
        "Dataset {} has {found} chapters, expected {expected}",
        .path.display(),
        expected = BOOK_CHAPTER_COUNT
    )]
    ChapterCount {
        /// Dataset path.
        path: PathBuf,
        /// Number of chapters found.
        found: usize,
    },
}

impl Book {
    /// Load and link a book from a JSON dataset file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file is missing or unreadable, is not a
    /// valid dataset, or does not contain exactly [`BOOK_CHAPTER_COUNT`]
    /// chapters.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let book = Self::from_json(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if book.chapter_count() != BOOK_CHAPTER_COUNT {
            return Err(LoadError::ChapterCount {
                path: path.to_path_buf(),
                found: book.chapter_count(),
            });
        }

        tracing::info!(
            path = %path.display(),
            chapters = book.chapter_count(),
            verses = book.verse_count(),
            "Loaded dataset"
        );

        Ok(book)
    }

    /// Parse and link a book from a JSON document.
    ///
    /// Chapters and verses are put in ascending number order before linking.
    /// The chapter count is not checked.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut book: Self = serde_json::from_str(json)?;

        book.chapters.sort_by_key(|c| c.number);
        for chapter in &mut book.chapters {
            chapter.verses.sort_by_key(|v| v.number);
        }

        link(&mut book);
        Ok(book)
    }
}
