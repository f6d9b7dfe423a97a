//! Core data model shared across the pipeline.

use crate::error::{C19Error, Result};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One day of running totals as reported by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// Reporting date.
    pub date: NaiveDate,
    /// Total cases up to and including `date`.
    pub cases: u64,
    /// Total deaths up to and including `date`.
    pub deaths: u64,
}

impl CumulativePoint {
    /// Creates a new cumulative point.
    #[must_use]
    pub const fn new(date: NaiveDate, cases: u64, deaths: u64) -> Self {
        Self {
            date,
            cases,
            deaths,
        }
    }
}

/// Day-over-day increment derived from two consecutive cumulative points.
///
/// Values are a plain difference and go negative when the source revises a
/// total downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaPoint {
    /// Date of the later of the two cumulative points.
    pub date: NaiveDate,
    /// New cases on `date`.
    pub new_cases: i64,
    /// New deaths on `date`.
    pub new_deaths: i64,
}

impl DeltaPoint {
    /// Creates a new delta point.
    #[must_use]
    pub const fn new(date: NaiveDate, new_cases: i64, new_deaths: i64) -> Self {
        Self {
            date,
            new_cases,
            new_deaths,
        }
    }
}

/// Selection of the world aggregate or a single country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Aggregate over every country.
    World,
    /// A single country, by name or ISO code as the source understands it.
    Country(String),
}

impl Scope {
    /// Identifier the source uses for the world aggregate.
    pub const WORLD_ID: &'static str = "all";

    /// Parses a user-supplied identifier. `"all"` (any case) is the world.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty identifier.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(C19Error::validation(
                "country must not be empty",
                Some("country".to_string()),
            ));
        }
        if trimmed.eq_ignore_ascii_case(Self::WORLD_ID) {
            Ok(Self::World)
        } else {
            Ok(Self::Country(trimmed.to_string()))
        }
    }

    /// Path segment used in source URLs and artifact names.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::World => Self::WORLD_ID,
            Self::Country(id) => id,
        }
    }

    /// Whether this is the world aggregate.
    #[must_use]
    pub const fn is_world(&self) -> bool {
        matches!(self, Self::World)
    }
}

impl FromStr for Scope {
    type Err = C19Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How much history to request from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    /// The trailing `n` days; the source answers with `n` raw points.
    LastDays(u32),
    /// Full history.
    All,
}

impl Window {
    /// Window that yields `deltas` increments once the baseline is dropped.
    #[must_use]
    pub const fn for_deltas(deltas: u32) -> Self {
        Self::LastDays(deltas.saturating_add(1))
    }

    /// Value of the `lastdays` query parameter.
    #[must_use]
    pub fn query_value(&self) -> String {
        match self {
            Self::LastDays(n) => n.to_string(),
            Self::All => "all".to_string(),
        }
    }
}

impl FromStr for Window {
    type Err = C19Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        match trimmed.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self::LastDays(n)),
            _ => Err(C19Error::validation(
                format!("window must be a positive day count or 'all', got '{trimmed}'"),
                Some("window".to_string()),
            )),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.query_value())
    }
}

/// File type of a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Rendered chart image.
    Png,
    /// Delta series export.
    Csv,
    /// Composed report document.
    Pdf,
}

impl ArtifactKind {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A generated file on disk, owned by whoever received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Absolute or output-directory-relative path of the file.
    pub path: PathBuf,
    /// What the file contains.
    pub kind: ArtifactKind,
    /// When the write completed.
    pub created_at: DateTime<Local>,
}

impl Artifact {
    /// Creates a new artifact record.
    #[must_use]
    pub const fn new(path: PathBuf, kind: ArtifactKind, created_at: DateTime<Local>) -> Self {
        Self {
            path,
            kind,
            created_at,
        }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, used when delivering the file elsewhere.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

/// Point-in-time figures from `/countries/{id}` or `/all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryFields {
    /// Country name as the source spells it; absent for the world.
    pub country: Option<String>,
    /// Population.
    pub population: u64,
    /// Currently active cases; the source derives this and it can dip below zero.
    pub active: i64,
    /// Cases in critical condition.
    pub critical: u64,
    /// Recovered total.
    pub recovered: u64,
    /// Case total.
    pub cases: u64,
    /// Death total.
    pub deaths: u64,
    /// Tests performed.
    pub tests: u64,
}
