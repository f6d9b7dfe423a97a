//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(
    name = "c19-report",
    version,
    about = "COVID-19 charts, CSV exports and PDF reports"
)]
pub struct Cli {
    /// Configuration file (YAML or TOML). Defaults to ./config.yaml and friends.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory the finished file is copied to.
    #[arg(long, global = true, env = "C19_DELIVER_TO", default_value = ".")]
    pub deliver_to: PathBuf,

    /// Leave the generated file in the output directory after delivery.
    #[arg(long, global = true, default_value_t = false)]
    pub keep: bool,

    /// Language for titles and messages, e.g. `en-US` or `ja-JP`.
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// What to produce.
    #[command(subcommand)]
    pub command: Command,
}

/// One flow per subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Monthly chart of new cases and deaths.
    Chart {
        /// Country name or ISO code; `all` for the world.
        country: String,
    },
    /// Weekly chart for the configured reference country.
    Weekly,
    /// Full daily history as CSV.
    Csv {
        /// Country name or ISO code; `all` for the world.
        country: String,
    },
    /// PDF report with the monthly chart and a summary table.
    Report {
        /// Country name or ISO code; `all` for the world.
        country: String,
    },
    /// Current figures printed to stdout.
    Summary {
        /// Country name or ISO code; `all` for the world.
        country: String,
    },
}
