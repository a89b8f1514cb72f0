//! Configuration management for Gita.
//!
//! Parses `gita.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [library]
//! default_language = "lt"
//!
//! [[library.languages]]
//! id = "lt"
//! dataset = "public/texts/lt/83.json"
//!
//! [[library.languages]]
//! id = "en"
//! title = "Bhagavad-gita As It Is"
//!
//! [site]
//! public_dir = "public"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `server.host` and every `library.languages[].dataset` support
//! `${VAR}` and `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override static files directory. A relative path resolves against the
    /// current directory; `site.favicon` keeps resolving against the config
    /// file's directory.
    pub public_dir: Option<PathBuf>,
    /// Override default language.
    pub default_language: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "gita.toml";

/// Default page title.
const DEFAULT_TITLE: &str = "Bhagavad-Gita As It Is. Translation and commentaries by HDG A.C.Bhaktivedanta Swami Prabhupada";

/// Default page keywords.
const DEFAULT_KEYWORDS: &str = "Bhagavad Gita As It Is, Bhagavad-gītā, Bhagavad Gita, gita, ISKCON, Prabhupada, A.C. Bhaktivedanta Swami";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Library configuration (paths are relative strings from TOML).
    library: LibraryConfigRaw,
    /// Site configuration (paths are relative strings from TOML).
    site: SiteConfigRaw,

    /// Resolved library configuration (set after loading).
    #[serde(skip)]
    pub library_resolved: LibraryConfig,
    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port. Usually supplied by the `PORT` argument or variable.
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: None,
        }
    }
}

/// Raw library configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct LibraryConfigRaw {
    default_language: Option<String>,
    languages: Option<Vec<LanguageConfigRaw>>,
}

/// Raw language entry as parsed from TOML.
#[derive(Debug, Deserialize)]
struct LanguageConfigRaw {
    id: String,
    dataset: Option<String>,
    title: Option<String>,
    keywords: Option<String>,
}

/// Resolved language entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Language id used in URLs.
    pub id: String,
    /// Absolute dataset path, `None` to share the default language's dataset.
    pub dataset: Option<PathBuf>,
    /// Page title override.
    pub title: Option<String>,
    /// Page keywords override.
    pub keywords: Option<String>,
}

/// Resolved library configuration.
#[derive(Debug, Default)]
pub struct LibraryConfig {
    /// Language served at `/` and by bare-number URLs.
    pub default_language: String,
    /// Configured languages in declaration order.
    pub languages: Vec<LanguageConfig>,
}

impl LibraryConfig {
    /// Default languages relative to `base`: Lithuanian with its dataset and
    /// English sharing it.
    fn default_with_base(base: &Path) -> Self {
        Self {
            default_language: "lt".to_owned(),
            languages: vec![
                LanguageConfig {
                    id: "lt".to_owned(),
                    dataset: Some(base.join("public/texts/lt/83.json")),
                    title: None,
                    keywords: None,
                },
                LanguageConfig {
                    id: "en".to_owned(),
                    dataset: None,
                    title: None,
                    keywords: None,
                },
            ],
        }
    }

    /// Look up a configured language.
    #[must_use]
    pub fn language(&self, id: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|l| l.id == id)
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    title: Option<String>,
    keywords: Option<String>,
    public_dir: Option<String>,
    favicon: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Default page title.
    pub title: String,
    /// Default page keywords.
    pub keywords: String,
    /// Directory served under `/public/`.
    pub public_dir: PathBuf,
    /// File served at `/favicon.ico`.
    pub favicon: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.host`").
        field: String,
        /// Error message (e.g., "${`DATA_ROOT`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Resolve a relative command-line path against the current directory.
fn resolve_against_cwd(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().unwrap_or_default().join(path)
}

/// Language ids are two or three lowercase ASCII letters.
fn is_language_id(id: &str) -> bool {
    (2..=3).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_lowercase())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `gita.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = Some(port);
        }
        if let Some(public_dir) = &settings.public_dir {
            self.site_resolved.public_dir = resolve_against_cwd(public_dir);
        }
        if let Some(language) = &settings.default_language {
            self.library_resolved.default_language.clone_from(language);
        }
    }

    /// Get the listening port.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if no port was given on the command
    /// line, in `$PORT`, or in the config file.
    pub fn require_port(&self) -> Result<u16, ConfigError> {
        self.server.port.ok_or_else(|| {
            ConfigError::Validation(
                "Port number must be specified either as a first argument or $PORT environment variable"
                    .to_owned(),
            )
        })
    }

    /// Page title and keywords for a language, falling back to the site defaults.
    #[must_use]
    pub fn page_settings(&self, language: &str) -> (String, String) {
        let entry = self.library_resolved.language(language);
        let title = entry
            .and_then(|l| l.title.clone())
            .unwrap_or_else(|| self.site_resolved.title.clone());
        let keywords = entry
            .and_then(|l| l.keywords.clone())
            .unwrap_or_else(|| self.site_resolved.keywords.clone());
        (title, keywords)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            library: LibraryConfigRaw::default(),
            site: SiteConfigRaw::default(),
            library_resolved: LibraryConfig::default_with_base(base),
            site_resolved: SiteConfig {
                title: DEFAULT_TITLE.to_owned(),
                keywords: DEFAULT_KEYWORDS.to_owned(),
                public_dir: base.join("public"),
                favicon: base.join("favicon.ico"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_library()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == Some(0) {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate library configuration.
    fn validate_library(&self) -> Result<(), ConfigError> {
        let library = &self.library_resolved;

        if library.languages.is_empty() {
            return Err(ConfigError::Validation(
                "library.languages must list at least one language".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for language in &library.languages {
            if !is_language_id(&language.id) {
                return Err(ConfigError::Validation(format!(
                    "library.languages: invalid language id '{}' (expected 2-3 lowercase letters)",
                    language.id
                )));
            }
            if !seen.insert(language.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "library.languages: duplicate language id '{}'",
                    language.id
                )));
            }
        }

        let default = library.language(&library.default_language).ok_or_else(|| {
            ConfigError::Validation(format!(
                "library.default_language '{}' is not listed in library.languages",
                library.default_language
            ))
        })?;
        if default.dataset.is_none() {
            return Err(ConfigError::Validation(format!(
                "library.default_language '{}' must have a dataset",
                default.id
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref mut languages) = self.library.languages {
            for language in languages {
                if let Some(ref dataset) = language.dataset {
                    let field = format!("library.languages.{}.dataset", language.id);
                    language.dataset = Some(expand::expand_env(dataset, &field)?);
                }
            }
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = Self::default_with_base(config_dir);

        self.library_resolved = match self.library.languages.take() {
            Some(languages) => LibraryConfig {
                default_language: self
                    .library
                    .default_language
                    .clone()
                    .unwrap_or(defaults.library_resolved.default_language),
                languages: languages
                    .into_iter()
                    .map(|l| LanguageConfig {
                        id: l.id,
                        dataset: l.dataset.map(|d| config_dir.join(d)),
                        title: l.title,
                        keywords: l.keywords,
                    })
                    .collect(),
            },
            None => LibraryConfig {
                default_language: self
                    .library
                    .default_language
                    .clone()
                    .unwrap_or(defaults.library_resolved.default_language),
                languages: defaults.library_resolved.languages,
            },
        };

        let site = &self.site;
        self.site_resolved = SiteConfig {
            title: site.title.clone().unwrap_or(defaults.site_resolved.title),
            keywords: site
                .keywords
                .clone()
                .unwrap_or(defaults.site_resolved.keywords),
            public_dir: site
                .public_dir
                .as_deref()
                .map_or(defaults.site_resolved.public_dir, |d| config_dir.join(d)),
            favicon: site
                .favicon
                .as_deref()
                .map_or(defaults.site_resolved.favicon, |f| config_dir.join(f)),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str, base: &Path) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(base);
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, None);
        assert_eq!(config.library_resolved.default_language, "lt");
        assert_eq!(
            config.library_resolved.language("lt").unwrap().dataset,
            Some(PathBuf::from("/test/public/texts/lt/83.json"))
        );
        assert_eq!(config.library_resolved.language("en").unwrap().dataset, None);
        assert_eq!(config.site_resolved.public_dir, PathBuf::from("/test/public"));
        assert_eq!(config.site_resolved.favicon, PathBuf::from("/test/favicon.ico"));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse("", Path::new("/site"));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.library_resolved.languages.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config = parse(toml, Path::new("/site"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.require_port().unwrap(), 9000);
    }

    #[test]
    fn test_parse_languages_resolves_paths() {
        let toml = r#"
[library]
default_language = "en"

[[library.languages]]
id = "en"
dataset = "texts/en.json"
title = "Bhagavad-gita As It Is"

[[library.languages]]
id = "lt"
dataset = "/data/lt.json"
"#;
        let config = parse(toml, Path::new("/site"));
        let library = &config.library_resolved;

        assert_eq!(library.default_language, "en");
        assert_eq!(
            library.languages,
            vec![
                LanguageConfig {
                    id: "en".to_owned(),
                    dataset: Some(PathBuf::from("/site/texts/en.json")),
                    title: Some("Bhagavad-gita As It Is".to_owned()),
                    keywords: None,
                },
                LanguageConfig {
                    id: "lt".to_owned(),
                    dataset: Some(PathBuf::from("/data/lt.json")),
                    title: None,
                    keywords: None,
                },
            ]
        );
    }

    #[test]
    fn test_parse_site_config() {
        let toml = r#"
[site]
title = "Gita"
public_dir = "static"
"#;
        let config = parse(toml, Path::new("/site"));
        assert_eq!(config.site_resolved.title, "Gita");
        assert_eq!(config.site_resolved.keywords, DEFAULT_KEYWORDS);
        assert_eq!(config.site_resolved.public_dir, PathBuf::from("/site/static"));
        assert_eq!(config.site_resolved.favicon, PathBuf::from("/site/favicon.ico"));
    }

    #[test]
    fn test_page_settings_fall_back_to_site() {
        let toml = r#"
[[library.languages]]
id = "lt"
dataset = "lt.json"
keywords = "Gita, Bhagavad-gita"

[[library.languages]]
id = "en"
title = "Bhagavad-gita As It Is"
"#;
        let config = parse(toml, Path::new("/site"));

        let (title, keywords) = config.page_settings("lt");
        assert_eq!(title, DEFAULT_TITLE);
        assert_eq!(keywords, "Gita, Bhagavad-gita");

        let (title, keywords) = config.page_settings("en");
        assert_eq!(title, "Bhagavad-gita As It Is");
        assert_eq!(keywords, DEFAULT_KEYWORDS);
    }

    #[test]
    fn test_expand_env_vars_dataset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("GITA_TEST_TEXTS", "/srv/texts");
        }

        let toml = r#"
[[library.languages]]
id = "lt"
dataset = "${GITA_TEST_TEXTS}/lt.json"
"#;
        let config = parse(toml, Path::new("/site"));

        assert_eq!(
            config.library_resolved.languages[0].dataset,
            Some(PathBuf::from("/srv/texts/lt.json"))
        );

        unsafe {
            std::env::remove_var("GITA_TEST_TEXTS");
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("gita.toml");
        std::fs::write(&path, "[server]\nport = 8081\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.server.port, Some(8081));
        assert_eq!(config.config_path, Some(path));
        assert_eq!(
            config.site_resolved.public_dir,
            temp_dir.path().join("public")
        );
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/gita.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            port: Some(3000),
            public_dir: Some(PathBuf::from("/assets")),
            default_language: Some("en".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.server.host, "0.0.0.0"); // Unchanged
        assert_eq!(config.server.port, Some(3000));
        assert_eq!(config.site_resolved.public_dir, PathBuf::from("/assets"));
        assert_eq!(config.library_resolved.default_language, "en");
    }

    #[test]
    fn test_apply_cli_relative_public_dir_uses_cwd() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let settings = CliSettings {
            public_dir: Some(PathBuf::from("static")),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        let cwd = std::env::current_dir().unwrap();
        assert_eq!(config.site_resolved.public_dir, cwd.join("static"));
        assert_eq!(config.site_resolved.favicon, PathBuf::from("/test/favicon.ico"));
    }

    #[test]
    fn test_require_port_missing() {
        let config = Config::default_with_base(Path::new("/test"));
        let err = config.require_port().unwrap_err();
        assert!(err.to_string().contains("$PORT"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        assert_validation_error(&config, &["server.host", "empty"]);
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = Some(0);
        assert_validation_error(&config, &["server.port"]);
    }

    #[test]
    fn test_validate_no_languages() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.languages.clear();
        assert_validation_error(&config, &["at least one language"]);
    }

    #[test]
    fn test_validate_invalid_language_id() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.languages[1].id = "EN".to_owned();
        assert_validation_error(&config, &["invalid language id", "EN"]);
    }

    #[test]
    fn test_validate_numeric_language_id() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.languages[1].id = "18".to_owned();
        assert_validation_error(&config, &["invalid language id"]);
    }

    #[test]
    fn test_validate_duplicate_language() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.languages[1].id = "lt".to_owned();
        assert_validation_error(&config, &["duplicate", "lt"]);
    }

    #[test]
    fn test_validate_unknown_default_language() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.default_language = "de".to_owned();
        assert_validation_error(&config, &["default_language", "de"]);
    }

    #[test]
    fn test_validate_default_language_needs_dataset() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.library_resolved.default_language = "en".to_owned();
        assert_validation_error(&config, &["en", "dataset"]);
    }
}
