//! Configuration loading with environment variable overrides

use crate::schema::C19Config;
use c19_common::{C19Error, Result as C19Result};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "C19_CONFIG_PATH";

/// File names probed in the working directory when no path is given.
const DEFAULT_CONFIG_FILES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Name of the offending variable.
        var: String,
        /// Why the value was rejected.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] C19Error),
}

impl From<ConfigError> for C19Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(inner) => inner,
            other => Self::config_with_source("could not load configuration", other),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    ///
    /// # Errors
    ///
    /// Fails on unreadable files, parse errors, bad overrides or invalid values.
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<C19Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(path, &content)?;
        debug!(path = %path.display(), "parsed configuration file");

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the environment, `.env`, and the first config file found
    ///
    /// Search order: `$C19_CONFIG_PATH`, then `config.yaml`, `config.yml`,
    /// `config.toml` in the working directory, then built-in defaults.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load() -> C19Result<C19Config> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("ignoring unreadable .env file: {e}");
            }
        }

        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            info!(path = %path, "loading configuration from {CONFIG_PATH_VAR}");
            return Ok(Self::load_config(path)?);
        }

        if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .map(Path::new)
            .find(|p| p.exists())
        {
            info!(path = %path.display(), "loading configuration");
            return Ok(Self::load_config(path)?);
        }

        info!("no configuration file found, using defaults");
        let mut config = C19Config::default();
        Self::apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load_config`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> C19Result<C19Config> {
        Ok(Self::load_config(path)?)
    }

    /// Parse configuration text, choosing the format by file extension
    ///
    /// # Errors
    ///
    /// Fails for unknown extensions and malformed documents.
    pub fn parse(path: &Path, content: &str) -> Result<C19Config, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Ok(serde_yaml::from_str(content)?),
            Some("toml") => Ok(toml::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Apply process environment overrides to configuration
    fn apply_env_overrides(config: &mut C19Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |key| env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`
    ///
    /// `BASE_URL` and `LOCAL_FOLDER` keep the names existing deployments use.
    ///
    /// # Errors
    ///
    /// Fails when a numeric variable does not parse.
    pub fn apply_overrides_from<F>(config: &mut C19Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BASE_URL") {
            config.source.base_url = url;
        }

        if let Some(folder) = lookup("LOCAL_FOLDER") {
            config.output.directory = PathBuf::from(folder);
        }

        if let Some(language) = lookup("C19_LOCALE") {
            config.locale.language = language;
        }

        if let Some(level) = lookup("C19_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(value) = lookup("C19_HTTP_TIMEOUT") {
            config.source.timeout_seconds = parse_var("C19_HTTP_TIMEOUT", &value)?;
        }

        if let Some(value) = lookup("C19_CHART_WIDTH") {
            config.chart.width = parse_var("C19_CHART_WIDTH", &value)?;
        }

        if let Some(value) = lookup("C19_CHART_HEIGHT") {
            config.chart.height = parse_var("C19_CHART_HEIGHT", &value)?;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParse {
        var: var.to_string(),
        source: Box::new(e),
    })
}
