//! Book model and chapter/verse navigation for Gita.
//!
//! This crate provides:
//! - [`Book`], [`Chapter`] and [`Verse`]: the in-memory scripture structure
//! - [`link`]: derivation of previous/next references from position alone
//! - [`Book::load`]: one-shot loading and linking of a JSON dataset
//! - [`Library`]: per-language books shared read-only across requests
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use gita_book::Book;
//!
//! let book = Book::load(Path::new("public/texts/lt/83.json"))?;
//!
//! let verse = book.verse(2, 13)?;
//! if let Some(next) = verse.next_verse.get() {
//!     println!("next verse: {}.{}", next.chapter, next.verse);
//! }
//! # Ok(())
//! # }
//! ```

mod book;
mod library;
mod linker;
mod loader;

pub use book::{Book, Chapter, LookupError, Verse, VerseRef};
pub use library::{LanguageSource, Library, LibraryError};
pub use linker::link;
pub use loader::{BOOK_CHAPTER_COUNT, LoadError};
