//! `gita serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use gita_config::{CliSettings, Config, ConfigError};
use gita_server::{run_server, server_config_from_gita_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Port to listen on when $PORT is unset (overrides config).
    port: Option<u16>,

    /// Path to configuration file (default: auto-discover gita.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Static files directory served under /public (overrides config).
    #[arg(long)]
    public_dir: Option<PathBuf>,

    /// Language served at / and by bare-number URLs (overrides config).
    #[arg(long)]
    default_language: Option<String>,

    /// Enable verbose output (request and loading logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, no port is given, a dataset
    /// fails to load, or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let port = resolve_port(std::env::var("PORT").ok().as_deref(), self.port)?;
        let cli_settings = CliSettings {
            host: self.host,
            port,
            public_dir: self.public_dir,
            default_language: self.default_language,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(path = ?config.config_path, "Configuration loaded");
        let server_config = server_config_from_gita_config(&config, version.to_owned())?;

        output.info(&format!(
            "Starting server on {}:{}",
            server_config.host, server_config.port
        ));
        output.info(&format!(
            "Languages: {} (default: {})",
            server_config
                .languages
                .iter()
                .map(|l| l.id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            server_config.default_language
        ));
        output.info(&format!(
            "Public directory: {}",
            server_config.public_dir.display()
        ));

        run_server(server_config).await?;

        Ok(())
    }
}

/// Resolve the listening port. A non-empty `$PORT` wins over the argument.
fn resolve_port(env_port: Option<&str>, arg_port: Option<u16>) -> Result<Option<u16>, ConfigError> {
    match env_port.filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map(Some).map_err(|_| {
            ConfigError::Validation(format!("$PORT is not a valid port number: '{value}'"))
        }),
        None => Ok(arg_port),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_resolve_port_env_wins_over_argument() {
        assert_eq!(resolve_port(Some("9999"), Some(8080)).unwrap(), Some(9999));
    }

    #[test]
    fn test_resolve_port_falls_back_to_argument() {
        assert_eq!(resolve_port(None, Some(8080)).unwrap(), Some(8080));
        assert_eq!(resolve_port(Some(""), Some(8080)).unwrap(), Some(8080));
    }

    #[test]
    fn test_resolve_port_none_given() {
        assert_eq!(resolve_port(None, None).unwrap(), None);
    }

    #[test]
    fn test_resolve_port_invalid_env() {
        let err = resolve_port(Some("http"), Some(8080)).unwrap_err();

        assert!(err.to_string().contains("$PORT is not a valid port number"));
    }
}
