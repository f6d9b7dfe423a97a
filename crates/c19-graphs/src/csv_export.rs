//! Delta series as comma-separated text.

use c19_common::utils::{format_source_date, sanitize_file_component};
use c19_common::{C19Error, DeltaPoint, Result, Scope};
use csv::{Terminator, WriterBuilder};

const HEADER: [&str; 3] = ["Date", "Cases", "Deaths"];

/// Serializes delta series to CSV.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvComposer;

impl CsvComposer {
    /// Header line followed by one `\n`-terminated row per delta, in input order.
    ///
    /// # Errors
    ///
    /// Only fails if the in-memory writer does.
    pub fn to_csv(deltas: &[DeltaPoint]) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(HEADER).map_err(compose_error)?;
        for delta in deltas {
            writer
                .write_record([
                    format_source_date(delta.date),
                    delta.new_cases.to_string(),
                    delta.new_deaths.to_string(),
                ])
                .map_err(compose_error)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| C19Error::compose_with_source("could not finish CSV", e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| C19Error::compose_with_source("CSV is not UTF-8", e))
    }

    /// File prefix for the full-history export of `scope`.
    #[must_use]
    pub fn file_prefix(scope: &Scope) -> String {
        format!("{}-all", sanitize_file_component(scope.id()))
    }
}

fn compose_error(err: csv::Error) -> C19Error {
    C19Error::compose_with_source("could not write CSV record", err)
}
