//! Structured logging bootstrap

use crate::error::{C19Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Configuration for the logging system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "c19_graphs=trace"); `RUST_LOG` wins when set
    pub level: String,
    /// Whether to emit one JSON object per event
    pub json_format: bool,
    /// Optional file path for log output; stderr otherwise
    pub file_path: Option<PathBuf>,
    /// Whether to log span open/close events
    pub include_spans: bool,
    /// Whether to include target module information
    pub include_targets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            file_path: None,
            include_spans: false,
            include_targets: true,
        }
    }
}

/// Initialize the global tracing subscriber with the given configuration
///
/// # Errors
///
/// Fails when the level filter does not parse, the log file location is
/// unusable, or a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            C19Error::config_with_source(format!("invalid log level '{}'", config.level), e)
        })?;

    let span_events = if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let writer = match &config.file_path {
        Some(path) => {
            let file_name = path.file_name().ok_or_else(|| {
                C19Error::config(format!("log file path '{}' has no file name", path.display()))
            })?;
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            BoxMakeWriter::new(tracing_appender::rolling::never(directory, file_name))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let layer = fmt::layer()
        .with_span_events(span_events)
        .with_target(config.include_targets)
        .with_ansi(config.file_path.is_none())
        .with_writer(writer);

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if config.json_format {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };

    installed.map_err(|e| C19Error::config_with_source("logging already initialized", e))?;

    tracing::debug!(
        level = %config.level,
        json = config.json_format,
        file = ?config.file_path,
        "logging initialized"
    );
    Ok(())
}

/// Initialize logging for development (debug level, spans on)
///
/// # Errors
///
/// See [`init_logging`].
pub fn init_dev_logging() -> Result<()> {
    init_logging(&LoggingConfig {
        level: "debug".to_string(),
        include_spans: true,
        ..LoggingConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_info_on_stderr() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.file_path.is_none());
        assert!(!config.json_format);
    }

    #[test]
    fn log_path_without_file_name_is_rejected() {
        let config = LoggingConfig {
            file_path: Some(PathBuf::from("/")),
            ..LoggingConfig::default()
        };
        let err = init_logging(&config).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Config);
    }
}
