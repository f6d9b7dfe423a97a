//! Runtime validation of a loaded configuration.

use crate::schema::C19Config;
use c19_common::{C19Error, Result};
use tracing::warn;
use unic_langid::LanguageIdentifier;
use url::Url;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, stopping at the first problem.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending field.
    pub fn validate(config: &C19Config) -> Result<()> {
        Self::validate_source(config)?;
        Self::validate_output(config)?;
        Self::validate_chart(config)?;
        Self::validate_report(config)?;
        Self::validate_locale(config)
    }

    fn validate_source(config: &C19Config) -> Result<()> {
        let url = Url::parse(&config.source.base_url).map_err(|e| {
            invalid(
                "source.base_url",
                format!("'{}' is not a valid URL: {e}", config.source.base_url),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "source.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("source.base_url", "URL cannot be used as a base"));
        }
        if config.source.timeout_seconds == 0 {
            return Err(invalid("source.timeout_seconds", "must be greater than zero"));
        }
        Ok(())
    }

    fn validate_output(config: &C19Config) -> Result<()> {
        if config.output.directory.as_os_str().is_empty() {
            return Err(invalid("output.directory", "must not be empty"));
        }
        Ok(())
    }

    fn validate_chart(config: &C19Config) -> Result<()> {
        let chart = &config.chart;
        if chart.width == 0 || chart.height == 0 {
            return Err(invalid("chart.width", "chart size must be non-zero"));
        }
        if chart.monthly_days == 0 {
            return Err(invalid("chart.monthly_days", "must be greater than zero"));
        }
        if chart.weekly_days == 0 {
            return Err(invalid("chart.weekly_days", "must be greater than zero"));
        }
        if chart.weekly_country.trim().is_empty() {
            return Err(invalid("chart.weekly_country", "must not be empty"));
        }
        for (field, value) in [
            ("chart.background_color", &chart.background_color),
            ("chart.font_color", &chart.font_color),
            ("chart.cases_color", &chart.cases_color),
            ("chart.deaths_color", &chart.deaths_color),
            ("chart.weekly_color", &chart.weekly_color),
        ] {
            if !is_hex_color(value) {
                return Err(invalid(field, format!("'{value}' is not a #RRGGBB colour")));
            }
        }
        Ok(())
    }

    fn validate_report(config: &C19Config) -> Result<()> {
        let report = &config.report;
        if !(report.image_width_pt > 0.0 && report.image_height_pt > 0.0) {
            return Err(invalid("report.image_width_pt", "image size must be positive"));
        }
        if let Some(font) = &report.font_path {
            if !font.is_file() {
                return Err(invalid(
                    "report.font_path",
                    format!("font file '{}' does not exist", font.display()),
                ));
            }
        }
        Ok(())
    }

    fn validate_locale(config: &C19Config) -> Result<()> {
        let language = config
            .locale
            .language
            .parse::<LanguageIdentifier>()
            .map_err(|e| {
                invalid(
                    "locale.language",
                    format!("'{}' is not a language tag: {e}", config.locale.language),
                )
            })?;
        if Self::pdf_font_missing(config) {
            warn!(
                locale = %language,
                "no report.font_path set; the builtin PDF font cannot show this locale's text"
            );
        }
        Ok(())
    }

    /// Whether PDF reports in the configured locale need a font file that is not set.
    ///
    /// The builtin Helvetica only covers Latin text. Charts, CSV and summaries
    /// are unaffected, so this is a warning rather than an error.
    #[must_use]
    pub fn pdf_font_missing(config: &C19Config) -> bool {
        let latin_only = config
            .locale
            .language
            .parse::<LanguageIdentifier>()
            .is_ok_and(|id| id.language.as_str() == "en");
        !latin_only && config.report.font_path.is_none()
    }
}

/// Whether `value` looks like `#RRGGBB`.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn invalid(field: &str, message: impl Into<String>) -> C19Error {
    C19Error::validation(message, Some(field.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use c19_common::ErrorKind;

    fn field_of(err: &C19Error) -> Option<&str> {
        match err {
            C19Error::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(ConfigValidator::validate(&C19Config::default()).is_ok());
        assert!(!ConfigValidator::pdf_font_missing(&C19Config::default()));
    }

    #[test]
    fn japanese_without_font_is_flagged_but_valid() {
        let mut config = C19Config::default();
        config.locale.language = "ja-JP".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());
        assert!(ConfigValidator::pdf_font_missing(&config));

        let font = tempfile::NamedTempFile::new().unwrap();
        config.report.font_path = Some(font.path().to_path_buf());
        assert!(ConfigValidator::validate(&config).is_ok());
        assert!(!ConfigValidator::pdf_font_missing(&config));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut config = C19Config::default();
        config.source.base_url = "ftp://example.com/".to_string();
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(field_of(&err), Some("source.base_url"));
    }

    #[test]
    fn rejects_zero_sized_chart() {
        let mut config = C19Config::default();
        config.chart.height = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn rejects_bad_colour() {
        let mut config = C19Config::default();
        config.chart.deaths_color = "magenta".to_string();
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(&err), Some("chart.deaths_color"));
    }

    #[test]
    fn rejects_missing_font() {
        let mut config = C19Config::default();
        config.report.font_path = Some("/definitely/not/here.ttf".into());
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(&err), Some("report.font_path"));
    }

    #[test]
    fn rejects_garbage_language() {
        let mut config = C19Config::default();
        config.locale.language = "not a tag".to_string();
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn hex_colours() {
        assert!(is_hex_color("#00ff7F"));
        assert!(!is_hex_color("00ff7F"));
        assert!(!is_hex_color("#00ff7"));
        assert!(!is_hex_color("#00ff7G"));
    }
}
