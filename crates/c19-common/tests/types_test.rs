//! Tests for the shared data model in c19-common.
//!
//! This test suite covers:
//! - Serde shape of the types that cross crate boundaries
//! - Scope and window parsing from user input
//! - Summary decoding from source bodies with missing fields

use c19_common::types::*;
use c19_common::ErrorKind;
use chrono::NaiveDate;
use std::collections::HashMap;

#[cfg(test)]
mod trait_tests {
    use super::*;

    #[test]
    fn test_scope_display_and_hash() {
        let japan = Scope::parse("Japan").unwrap();
        assert_eq!(japan.to_string(), "Japan");
        assert_eq!(Scope::World.to_string(), "all");

        let mut seen = HashMap::new();
        seen.insert(japan.clone(), 1);
        seen.insert(Scope::World, 2);
        assert_eq!(seen.get(&Scope::Country("Japan".to_string())), Some(&1));
        assert!(Scope::World.is_world());
        assert!(!japan.is_world());
    }

    #[test]
    fn test_delta_point_serialization() {
        let point = DeltaPoint::new(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(), -4, 2);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, r#"{"date":"2020-03-01","new_cases":-4,"new_deaths":2}"#);

        let back: DeltaPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_artifact_kind_extensions() {
        assert_eq!(ArtifactKind::Png.extension(), "png");
        assert_eq!(ArtifactKind::Csv.extension(), "csv");
        assert_eq!(ArtifactKind::Pdf.to_string(), "pdf");
    }
}

#[cfg(test)]
mod parsing_tests {
    use super::*;

    #[test]
    fn test_scope_from_str() {
        let scope: Scope = "all".parse().unwrap();
        assert_eq!(scope, Scope::World);

        let err = "".parse::<Scope>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_window_display_matches_query_value() {
        assert_eq!(Window::LastDays(8).to_string(), "8");
        assert_eq!(Window::All.to_string(), "all");
    }

    #[test]
    fn test_summary_fields_tolerate_missing_values() {
        let summary: SummaryFields =
            serde_json::from_str(r#"{"population": 7800000000, "cases": 10, "extra": true}"#)
                .unwrap();
        assert_eq!(summary.population, 7_800_000_000);
        assert_eq!(summary.cases, 10);
        assert_eq!(summary.tests, 0);
        assert!(summary.country.is_none());
    }

    #[test]
    fn test_summary_fields_negative_active() {
        let summary: SummaryFields =
            serde_json::from_str(r#"{"country": "Nowhere", "active": -12}"#).unwrap();
        assert_eq!(summary.active, -12);
        assert_eq!(summary.country.as_deref(), Some("Nowhere"));
    }
}
