//! # C19 Graphs
//!
//! The report pipeline: fetch cumulative series, turn them into daily
//! increments, and produce chart, CSV and PDF artifacts.
//!
//! Each stage is a separate component so callers can stop at any point:
//! [`TimeSeriesFetcher`] → [`to_deltas`] → [`ChartConfigBuilder`] →
//! [`ChartRenderer`] → [`ArtifactWriter`], with [`CsvComposer`] and
//! [`ReportComposer`] as alternative sinks. [`ReportPipeline`] wires them
//! together and reports which stage failed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod config_builder;
pub mod csv_export;
pub mod data_fetcher;
pub mod delta;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod traits;
pub mod types;

pub use artifact::{cleanup, ArtifactGuard, ArtifactWriter};
pub use config_builder::ChartConfigBuilder;
pub use csv_export::CsvComposer;
pub use data_fetcher::TimeSeriesFetcher;
pub use delta::to_deltas;
pub use pipeline::{PipelineFailure, PipelineResult, PipelineStage, ReportPipeline};
pub use renderer::{ChartRenderer, ChartTheme};
pub use report::ReportComposer;
pub use traits::DataSource;
pub use types::*;
