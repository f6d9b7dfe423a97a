//! Configuration schema definitions.

use c19_common::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for c19-report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct C19Config {
    /// Remote data source.
    pub source: SourceConfig,
    /// Where artifacts land and how they are named.
    pub output: OutputConfig,
    /// Chart raster size, theme and day windows.
    pub chart: ChartConfig,
    /// PDF layout.
    pub report: ReportConfig,
    /// Language for titles, labels and user-facing messages.
    pub locale: LocaleConfig,
    /// Logging setup.
    pub logging: LoggingConfig,
}

/// Data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the COVID-19 API; must end with `/` to act as a directory.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// User-Agent header sent with each request.
    pub user_agent: String,
}

/// How artifact file names avoid collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// `{prefix}-{timestamp}.{ext}`; a second write within the same second overwrites.
    Timestamp,
    /// `{prefix}-{timestamp}-{token}.{ext}` with a random token.
    UniqueSuffix,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives every generated artifact.
    pub directory: PathBuf,
    /// File naming policy.
    pub naming: NamingPolicy,
}

/// Chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Font family passed to the rasterizer.
    pub font_family: String,
    /// Background colour, `#RRGGBB`.
    pub background_color: String,
    /// Text and axis colour, `#RRGGBB`.
    pub font_color: String,
    /// New-cases bar colour in the monthly chart.
    pub cases_color: String,
    /// Deaths line colour in the monthly chart.
    pub deaths_color: String,
    /// New-cases area colour in the weekly chart.
    pub weekly_color: String,
    /// Number of daily increments in the monthly chart.
    pub monthly_days: u32,
    /// Number of daily increments in the weekly chart.
    pub weekly_days: u32,
    /// Country plotted by the weekly chart.
    pub weekly_country: String,
}

/// PDF report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// TrueType font embedded in the PDF; builtin Helvetica when unset.
    /// Japanese text needs a CJK font here.
    pub font_path: Option<PathBuf>,
    /// Displayed chart width in points.
    pub image_width_pt: f32,
    /// Displayed chart height in points.
    pub image_height_pt: f32,
}

/// Localization configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// BCP 47 language tag, e.g. `en-US` or `ja-JP`.
    pub language: String,
    /// Directory with `{lang}/main.ftl` files overriding the bundled ones.
    pub locales_dir: Option<PathBuf>,
}

impl C19Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint as a validation error.
    pub fn validate(&self) -> c19_common::Result<()> {
        crate::validator::ConfigValidator::validate(self)
    }
}
