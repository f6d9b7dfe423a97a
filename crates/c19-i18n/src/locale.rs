//! Supported locales

use crate::error::{I18nError, I18nResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use unic_langid::LanguageIdentifier;

/// Supported locales
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Locale {
    /// English (United States)
    #[default]
    English,
    /// Japanese
    Japanese,
}

impl Locale {
    /// Get the language code for this locale
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Japanese => "ja-JP",
        }
    }

    /// Get the short language code for this locale
    #[must_use]
    pub const fn short_code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Japanese => "ja",
        }
    }

    /// Parse a locale from a BCP 47 tag; only the language subtag matters
    ///
    /// # Errors
    ///
    /// Fails for malformed tags and for languages without translations.
    pub fn from_code(code: &str) -> I18nResult<Self> {
        let langid: LanguageIdentifier = code
            .parse()
            .map_err(|_| I18nError::InvalidLanguageId(code.to_string()))?;
        match langid.language.as_str() {
            "en" => Ok(Self::English),
            "ja" => Ok(Self::Japanese),
            _ => Err(I18nError::UnsupportedLocale(code.to_string())),
        }
    }

    /// Convert to Fluent `LanguageIdentifier`
    ///
    /// # Errors
    ///
    /// Never fails for the built-in codes; kept fallible for parity with parsing.
    pub fn to_language_identifier(&self) -> I18nResult<LanguageIdentifier> {
        self.code()
            .parse()
            .map_err(|_| I18nError::InvalidLanguageId(self.code().to_string()))
    }

    /// Get all supported locales
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::English, Self::Japanese]
    }

    /// Get the resource file name for this locale, relative to a locales directory
    #[must_use]
    pub fn resource_file(&self) -> String {
        format!("{}/main.ftl", self.short_code())
    }

    /// Translations compiled into the binary
    #[must_use]
    pub const fn bundled_resource(&self) -> &'static str {
        match self {
            Self::English => include_str!("../locales/en/main.ftl"),
            Self::Japanese => include_str!("../locales/ja/main.ftl"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
