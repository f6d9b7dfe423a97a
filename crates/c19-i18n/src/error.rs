//! Error types for internationalization operations

use c19_common::C19Error;
use thiserror::Error;

/// Errors that can occur during internationalization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// Failed to parse a language identifier
    #[error("Invalid language identifier: {0}")]
    InvalidLanguageId(String),

    /// The language is valid but has no bundled translations
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// Failed to load a resource file
    #[error("Failed to load resource file {path}: {source}")]
    ResourceLoad {
        /// Path of the `.ftl` file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a Fluent resource
    #[error("Failed to parse Fluent resource for {locale}: {errors:?}")]
    FluentParse {
        /// Locale code of the resource.
        locale: String,
        /// Parser or duplicate-message errors.
        errors: Vec<String>,
    },

    /// Message not found in any bundle
    #[error("Message not found: {key}")]
    MessageNotFound {
        /// Requested message id.
        key: String,
    },

    /// Failed to format a message
    #[error("Failed to format message '{key}': {errors:?}")]
    MessageFormat {
        /// Message id being formatted.
        key: String,
        /// Resolver errors, such as missing variables.
        errors: Vec<String>,
    },

    /// The country table could not be parsed
    #[error("Invalid country table: {0}")]
    CountryTable(#[from] serde_yaml::Error),
}

/// Result type for i18n operations
pub type I18nResult<T> = Result<T, I18nError>;

impl From<I18nError> for C19Error {
    fn from(err: I18nError) -> Self {
        let locale = match &err {
            I18nError::InvalidLanguageId(code) | I18nError::UnsupportedLocale(code) => {
                Some(code.clone())
            }
            I18nError::FluentParse { locale, .. } => Some(locale.clone()),
            _ => None,
        };
        Self::localization(err.to_string(), locale)
    }
}
