//! Application-wide error types using thiserror.

use c19_common::C19Error;
use c19_graphs::PipelineFailure;
use c19_i18n::I18nError;
use std::path::PathBuf;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Configuration, input or component setup error.
    #[error(transparent)]
    Core(#[from] C19Error),

    /// Locale or message catalogue error.
    #[error("Localization error: {0}")]
    Localization(#[from] I18nError),

    /// A pipeline run failed; `message` is the localized text for the user.
    #[error("{message}")]
    Pipeline {
        /// Localized sentence.
        message: String,
        /// Stage and cause.
        #[source]
        failure: PipelineFailure,
    },

    /// The artifact could not be copied to its destination.
    #[error("{message}")]
    Delivery {
        /// Localized sentence.
        message: String,
        /// Destination that failed.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Whether this error already carries a user-facing message.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::Pipeline { .. } | Self::Delivery { .. })
    }
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
