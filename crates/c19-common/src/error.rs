//! Error types and utilities for c19-report

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used as the optional cause of most variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for c19-report operations
pub type Result<T> = std::result::Result<T, C19Error>;

/// Coarse classification of a failure, used by the pipeline state machine
/// and for choosing the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Transport failure, non-success status or malformed body.
    Fetch,
    /// No usable data points after transformation.
    EmptySeries,
    /// Rasterization or image encoding failed.
    Render,
    /// Persisting bytes to disk failed.
    Write,
    /// Document assembly failed.
    Compose,
    /// Configuration could not be loaded or is invalid.
    Config,
    /// A message or locale could not be resolved.
    Localization,
    /// User input was rejected.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::EmptySeries => "empty-series",
            Self::Render => "render",
            Self::Write => "write",
            Self::Compose => "compose",
            Self::Config => "config",
            Self::Localization => "localization",
            Self::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Main error type for c19-report operations
#[derive(Error, Debug)]
pub enum C19Error {
    /// The data source could not be reached or answered with something unusable
    #[error("Fetch error: {message}")]
    Fetch {
        /// What went wrong.
        message: String,
        /// HTTP status, when the source answered.
        status: Option<u16>,
        /// Transport or decode error.
        #[source]
        source: Option<BoxError>,
    },

    /// The series had no points left after the delta transform
    #[error("No usable data points for {scope}")]
    EmptySeries {
        /// Scope identifier the series was fetched for.
        scope: String,
    },

    /// Chart drawing or PNG encoding errors
    #[error("Render error: {message}")]
    Render {
        /// What went wrong.
        message: String,
        /// Drawing or encoding error.
        #[source]
        source: Option<BoxError>,
    },

    /// I/O errors while persisting an artifact
    #[error("Write error for {}: {source}", path.display())]
    Write {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// PDF assembly errors
    #[error("Compose error: {message}")]
    Compose {
        /// What went wrong.
        message: String,
        /// Document library error.
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
        /// Parse or I/O error behind it.
        #[source]
        source: Option<BoxError>,
    },

    /// Internationalization and localization errors
    #[error("Localization error: {message}")]
    Localization {
        /// What went wrong.
        message: String,
        /// Locale code involved, if known.
        locale: Option<String>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        /// Why the value was rejected.
        message: String,
        /// Dotted name of the offending field.
        field: Option<String>,
    },
}

impl C19Error {
    /// Create a new fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch {
            message: msg.into(),
            status: None,
            source: None,
        }
    }

    /// Create a new fetch error carrying the HTTP status
    pub fn fetch_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Fetch {
            message: msg.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Create a new fetch error with source
    pub fn fetch_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Fetch {
            message: msg.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create an empty-series error for the given scope label
    pub fn empty_series(scope: impl Into<String>) -> Self {
        Self::EmptySeries {
            scope: scope.into(),
        }
    }

    /// Create a new render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new render error with source
    pub fn render_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Render {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new write error for `path`
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a new compose error
    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new compose error with source
    pub fn compose_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Compose {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error
    pub fn localization(msg: impl Into<String>, locale: Option<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            locale,
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>, field: Option<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field,
        }
    }

    /// Classify this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch { .. } => ErrorKind::Fetch,
            Self::EmptySeries { .. } => ErrorKind::EmptySeries,
            Self::Render { .. } => ErrorKind::Render,
            Self::Write { .. } => ErrorKind::Write,
            Self::Compose { .. } => ErrorKind::Compose,
            Self::Config { .. } => ErrorKind::Config,
            Self::Localization { .. } => ErrorKind::Localization,
            Self::Validation { .. } => ErrorKind::Validation,
        }
    }

    /// HTTP status attached to a fetch error, if the source answered at all
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for C19Error {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection to data source failed".to_string()
        } else if let Some(code) = status {
            format!("data source returned HTTP {code}")
        } else if err.is_decode() {
            "malformed response body".to_string()
        } else {
            "request to data source failed".to_string()
        };

        Self::Fetch {
            message,
            status,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "plotters")]
impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for C19Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Self::render_with_source("drawing failed", err)
    }
}
