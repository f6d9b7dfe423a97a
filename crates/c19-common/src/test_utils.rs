//! Test utilities and shared fixtures for the c19-report workspace.
//!
//! Enabled for other crates through the `testing` feature.

use crate::types::CumulativePoint;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for a local wall-clock time.
pub fn mock_local_time(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .earliest()
        .expect("valid local time")
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Series fixtures and canned source bodies.
pub mod fixtures {
    use super::*;

    /// First date of every generated fixture series (the source's first day).
    pub fn first_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 22).expect("valid date")
    }

    /// Builds consecutive daily points starting at [`first_date`].
    pub fn cumulative_series(totals: &[(u64, u64)]) -> Vec<CumulativePoint> {
        totals
            .iter()
            .enumerate()
            .map(|(offset, &(cases, deaths))| {
                let days = i64::try_from(offset).expect("fixture length fits i64");
                CumulativePoint::new(first_date() + Duration::days(days), cases, deaths)
            })
            .collect()
    }

    /// `/historical/all` body: flat cumulative maps.
    pub const WORLD_HISTORY_BODY: &str = r#"{
        "cases": {"1/22/20": 555, "1/23/20": 654, "1/24/20": 941},
        "deaths": {"1/22/20": 17, "1/23/20": 18, "1/24/20": 26},
        "recovered": {"1/22/20": 28, "1/23/20": 30, "1/24/20": 36}
    }"#;

    /// `/historical/Japan` body: maps nested under `timeline`.
    pub const COUNTRY_HISTORY_BODY: &str = r#"{
        "country": "Japan",
        "province": ["mainland"],
        "timeline": {
            "cases": {"12/30/21": 1732386, "12/31/21": 1733887, "1/1/22": 1734440, "1/2/22": 1735029},
            "deaths": {"12/30/21": 18392, "12/31/21": 18393, "1/1/22": 18393, "1/2/22": 18394},
            "recovered": {"12/30/21": 0, "12/31/21": 0, "1/1/22": 0, "1/2/22": 0}
        }
    }"#;

    /// `/countries/Japan` body, trimmed to the fields the reports use.
    pub const COUNTRY_SUMMARY_BODY: &str = r#"{
        "updated": 1641168000000,
        "country": "Japan",
        "countryInfo": {"iso2": "JP", "iso3": "JPN"},
        "cases": 1735029,
        "deaths": 18394,
        "recovered": 1710000,
        "active": 6635,
        "critical": 41,
        "tests": 33000000,
        "population": 126050796
    }"#;
}

/// Proptest strategies for cumulative series.
#[cfg(feature = "proptest")]
pub mod strategies {
    use super::fixtures::cumulative_series;
    use crate::types::CumulativePoint;
    use proptest::prelude::*;

    /// Non-decreasing series of length `0..max_len`.
    pub fn monotonic_series(max_len: usize) -> impl Strategy<Value = Vec<CumulativePoint>> {
        (
            0u64..1_000_000,
            0u64..10_000,
            prop::collection::vec((0u64..50_000, 0u64..500), 0..max_len),
        )
            .prop_map(|(start_cases, start_deaths, steps)| {
                let mut cases = start_cases;
                let mut deaths = start_deaths;
                let mut totals = Vec::with_capacity(steps.len() + 1);
                totals.push((cases, deaths));
                for (new_cases, new_deaths) in steps {
                    cases += new_cases;
                    deaths += new_deaths;
                    totals.push((cases, deaths));
                }
                cumulative_series(&totals)
            })
    }

    /// Series whose totals may go up or down from one day to the next.
    pub fn revised_series(max_len: usize) -> impl Strategy<Value = Vec<CumulativePoint>> {
        prop::collection::vec((0u64..10_000_000, 0u64..100_000), 0..max_len)
            .prop_map(|totals| cumulative_series(&totals))
    }
}
