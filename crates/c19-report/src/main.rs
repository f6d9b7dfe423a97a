//! Main entry point for c19-report.

use anyhow::Context;
use c19_common::init_logging;
use c19_config::{C19Config, ConfigLoader};
use c19_graphs::TimeSeriesFetcher;
use c19_i18n::{CountryDirectory, I18nManager, Locale};
use c19_report::{App, Cli, Delivery};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config.logging).context("could not initialize logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting c19-report");

    let locale = Locale::from_code(&config.locale.language)?;
    let i18n = Arc::new(I18nManager::new(locale, config.locale.locales_dir.as_deref())?);
    let names = Arc::new(CountryDirectory::bundled()?);
    let source = Arc::new(TimeSeriesFetcher::new(&config.source)?);

    let app = App::new(
        &config,
        source,
        i18n,
        names,
        Delivery {
            directory: cli.deliver_to.clone(),
            keep: cli.keep,
        },
    )?;

    match app.run(&cli.command).await {
        Ok(message) => {
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_user_facing() => {
            error!(error = ?e, "command failed");
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<C19Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::load()?,
    };

    if let Some(language) = &cli.locale {
        config.locale.language.clone_from(language);
        config.validate()?;
    }
    Ok(config)
}
