//! # C19 Config
//!
//! Typed configuration for c19-report.
//!
//! Configuration is loaded once at startup from YAML or TOML, overlaid with
//! environment variables, validated, and then handed to each component by
//! value. Nothing reads process-wide state after that.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
