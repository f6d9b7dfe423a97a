//! Default values for configuration.

use crate::schema::*;
use std::path::PathBuf;

/// Public disease.sh endpoint.
pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19/";

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: format!("c19-report/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./tmp"),
            naming: NamingPolicy::UniqueSuffix,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 1200,
            font_family: "sans-serif".to_string(),
            background_color: "#FFFFFF".to_string(),
            font_color: "#000000".to_string(),
            cases_color: "#008080".to_string(),
            deaths_color: "#FF00FF".to_string(),
            weekly_color: "#0000FF".to_string(),
            monthly_days: 30,
            weekly_days: 7,
            weekly_country: "Japan".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            image_width_pt: 450.0,
            image_height_pt: 300.0,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            locales_dir: None,
        }
    }
}
