//! Formatting helpers shared by the artifact writers and the CLI.

use chrono::{DateTime, Local, NaiveDate};

/// Second-granularity stamp embedded in artifact file names.
pub const FILE_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Human-readable generation time printed in reports.
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date key format used by the source (`1/22/20`).
pub const SOURCE_DATE_FORMAT: &str = "%m/%d/%y";

/// Formats `time` for use in a file name, e.g. `200122093005`.
#[must_use]
pub fn format_file_timestamp(time: &DateTime<Local>) -> String {
    time.format(FILE_TIMESTAMP_FORMAT).to_string()
}

/// Formats `time` as `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_report_time(time: &DateTime<Local>) -> String {
    time.format(REPORT_TIME_FORMAT).to_string()
}

/// Parses a source date key such as `1/22/20`.
#[must_use]
pub fn parse_source_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), SOURCE_DATE_FORMAT).ok()
}

/// Formats a date the way the source labels it, without zero padding.
#[must_use]
pub fn format_source_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%y").to_string()
}

/// Groups digits in threes: `126476461` becomes `126,476,461`.
#[must_use]
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Makes a user-supplied identifier safe to embed in a file name.
///
/// Letters, digits, `-` and `_` pass through; anything else becomes `_`.
#[must_use]
pub fn sanitize_file_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}
