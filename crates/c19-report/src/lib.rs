//! # C19 Report
//!
//! Command-line front end: parses arguments, loads configuration, runs one
//! pipeline flow and delivers the resulting file.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod error;

pub use app::*;
pub use cli::*;
pub use error::*;
