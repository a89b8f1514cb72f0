//! CLI error types.

use gita_book::LibraryError;
use gita_config::ConfigError;
use gita_server::StartupError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Server(#[from] StartupError),

    #[error("{0}")]
    Library(#[from] LibraryError),
}
