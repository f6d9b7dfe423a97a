//! # C19 I18n
//!
//! Localization for c19-report, built on Fluent.
//!
//! English and Japanese translations are compiled in and validated by the
//! build script; a directory of `{lang}/main.ftl` files can replace them at
//! runtime. Country display names come from a bundled table.
//!
//! ```rust
//! use c19_i18n::{fluent_args, I18nManager, Locale};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = I18nManager::bundled(Locale::Japanese)?;
//! let args = fluent_args!["datetime" => "2020-04-07 09:00:00"];
//! let line = manager.text("report-generated-at", args.as_ref());
//! assert_eq!(line, "作成時刻: 2020-04-07 09:00:00");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod countries;
pub mod error;
pub mod locale;
pub mod manager;
pub mod resource;

pub use bundle::BundleManager;
pub use countries::{CountryDirectory, CountryNameResolver};
pub use error::{I18nError, I18nResult};
pub use locale::Locale;
pub use manager::I18nManager;
pub use resource::ResourceManager;

// Re-export commonly used Fluent types
pub use fluent::{FluentArgs, FluentValue};
