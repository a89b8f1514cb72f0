//! `gita check` command implementation.
//!
//! Loads and links every configured dataset without starting the server.

use std::path::PathBuf;

use clap::Args;
use gita_config::Config;
use gita_server::load_library_from_gita_config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover gita.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or any dataset fails to load.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        tracing::info!(path = ?config.config_path, "Configuration loaded");

        let library = load_library_from_gita_config(&config)?;

        output.highlight("Library");
        for language in library.languages() {
            if let Some(book) = library.book(language) {
                output.info(&summary_line(language, library.default_language(), book));
            }
        }
        output.success("All datasets loaded and linked");

        Ok(())
    }
}

/// One summary line per language.
fn summary_line(language: &str, default_language: &str, book: &gita_book::Book) -> String {
    let marker = if language == default_language {
        " (default)"
    } else {
        ""
    };
    format!(
        "  {language}{marker}: {} chapters, {} verses",
        book.chapter_count(),
        book.verse_count()
    )
}

#[cfg(test)]
mod tests {
    use gita_book::{Book, Chapter, Verse};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_summary_line() {
        let book = Book::from_chapters(vec![
            Chapter::new(1, "One", vec![Verse::new(1), Verse::new(2)]),
            Chapter::new(2, "Two", vec![Verse::new(1)]),
        ]);

        assert_eq!(
            summary_line("lt", "lt", &book),
            "  lt (default): 2 chapters, 3 verses"
        );
        assert_eq!(summary_line("en", "lt", &book), "  en: 2 chapters, 3 verses");
    }
}
