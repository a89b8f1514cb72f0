//! HTTP server for Gita.
//!
//! This crate serves the linked books over HTTP using axum:
//! - Table of contents, chapter and verse pages per language
//! - Permanent redirects from bare numbers to the default language
//! - Static files from the public directory
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use gita_server::{LanguageSettings, ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         languages: vec![LanguageSettings {
//!             id: "lt".to_string(),
//!             dataset: Some(PathBuf::from("public/texts/lt/83.json")),
//!             title: "Bhagavad-gita".to_string(),
//!             keywords: "gita".to_string(),
//!         }],
//!         version: "1.0.0".to_string(),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (gita-server)
//!                        │
//!                        ├─► Page routes ──► Library ──► linked Book (gita-book)
//!                        │       │
//!                        │       └─► HTML pages (template)
//!                        │
//!                        └─► Static files (tower-http ServeDir)
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;
mod template;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use gita_book::{LanguageSource, Library, LibraryError};
use gita_config::ConfigError;
use state::{AppState, PageSettings};

/// Per-language settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSettings {
    /// Language id used in URLs.
    pub id: String,
    /// Dataset path (`None` shares the default language's book).
    pub dataset: Option<PathBuf>,
    /// Page title.
    pub title: String,
    /// Page keywords.
    pub keywords: String,
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Language served by `/` and bare-number URLs.
    pub default_language: String,
    /// Configured languages, in configuration order.
    pub languages: Vec<LanguageSettings>,
    /// Directory served under `/public`.
    pub public_dir: PathBuf,
    /// File served as `/favicon.ico`.
    pub favicon: PathBuf,
    /// Application version (for cache invalidation).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            default_language: "lt".to_string(),
            languages: Vec::new(),
            public_dir: PathBuf::from("public"),
            favicon: PathBuf::from("favicon.ico"),
            version: String::new(),
        }
    }
}

impl ServerConfig {
    /// Dataset sources for [`Library::load`].
    #[must_use]
    pub fn language_sources(&self) -> Vec<LanguageSource> {
        language_sources(&self.languages)
    }

    /// Load and link every configured dataset.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if any dataset fails to load.
    pub fn load_library(&self) -> Result<Library, LibraryError> {
        Library::load(&self.language_sources(), &self.default_language)
    }
}

fn language_sources(languages: &[LanguageSettings]) -> Vec<LanguageSource> {
    languages
        .iter()
        .map(|l| LanguageSource {
            id: l.id.clone(),
            dataset: l.dataset.clone(),
        })
        .collect()
}

/// Error that prevents the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Datasets could not be loaded.
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Host and port do not form a socket address.
    #[error("Invalid listen address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the server.
///
/// Loads and links every dataset before binding the listener, then serves
/// until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the datasets fail to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), StartupError> {
    let library = config.load_library()?;
    let state = Arc::new(app_state(&config, library));
    let app = app::create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let addr = SocketAddr::from_str(&address)
        .map_err(|source| StartupError::Address { address, source })?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app_state(config: &ServerConfig, library: Library) -> AppState {
    let pages: HashMap<_, _> = config
        .languages
        .iter()
        .map(|l| {
            (
                l.id.clone(),
                PageSettings {
                    title: l.title.clone(),
                    keywords: l.keywords.clone(),
                },
            )
        })
        .collect();

    AppState {
        library,
        pages,
        version: config.version.clone(),
        public_dir: config.public_dir.clone(),
        favicon: config.favicon.clone(),
    }
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Gita config.
///
/// # Arguments
///
/// * `config` - Gita configuration
/// * `version` - Application version
///
/// # Errors
///
/// Returns `ConfigError::Validation` if no port is configured.
pub fn server_config_from_gita_config(
    config: &gita_config::Config,
    version: String,
) -> Result<ServerConfig, ConfigError> {
    let port = config.require_port()?;

    Ok(ServerConfig {
        host: config.server.host.clone(),
        port,
        default_language: config.library_resolved.default_language.clone(),
        languages: language_settings(config),
        public_dir: config.site_resolved.public_dir.clone(),
        favicon: config.site_resolved.favicon.clone(),
        version,
    })
}

/// Load and link every dataset named by Gita config, without a port.
///
/// # Errors
///
/// Returns [`LibraryError`] if any dataset fails to load.
pub fn load_library_from_gita_config(config: &gita_config::Config) -> Result<Library, LibraryError> {
    Library::load(
        &language_sources(&language_settings(config)),
        &config.library_resolved.default_language,
    )
}

fn language_settings(config: &gita_config::Config) -> Vec<LanguageSettings> {
    config
        .library_resolved
        .languages
        .iter()
        .map(|l| {
            let (title, keywords) = config.page_settings(&l.id);
            LanguageSettings {
                id: l.id.clone(),
                dataset: l.dataset.clone(),
                title,
                keywords,
            }
        })
        .collect()
}
