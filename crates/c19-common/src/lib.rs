//! # C19 Common
//!
//! Shared types, errors and utilities for the c19-report workspace.
//!
//! This crate holds the data model that flows through the pipeline
//! (cumulative and delta points, scopes, windows, artifacts), the single
//! error type every component returns, and the logging bootstrap.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::*;
pub use logging::*;
pub use types::*;
pub use utils::*;
