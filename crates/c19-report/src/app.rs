//! Runs one command and delivers its artifact.

use crate::cli::Command;
use crate::error::{AppError, AppResult};
use c19_common::utils::format_thousands;
use c19_common::{Scope, SummaryFields};
use c19_config::C19Config;
use c19_graphs::{ArtifactGuard, ChartMode, DataSource, PipelineFailure, ReportPipeline};
use c19_i18n::{fluent_args, CountryNameResolver, FluentArgs, I18nManager};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Where finished files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Destination directory.
    pub directory: PathBuf,
    /// Keep the original in the output directory.
    pub keep: bool,
}

/// The application: one pipeline plus delivery.
pub struct App {
    pipeline: ReportPipeline,
    i18n: Arc<I18nManager>,
    names: Arc<dyn CountryNameResolver>,
    delivery: Delivery,
}

impl App {
    /// Wires the pipeline from `config` around `source`.
    ///
    /// # Errors
    ///
    /// Fails when the pipeline cannot be built from the configuration.
    pub fn new(
        config: &C19Config,
        source: Arc<dyn DataSource>,
        i18n: Arc<I18nManager>,
        names: Arc<dyn CountryNameResolver>,
        delivery: Delivery,
    ) -> AppResult<Self> {
        let pipeline =
            ReportPipeline::new(config, source, Arc::clone(&i18n), Arc::clone(&names))?;
        Ok(Self {
            pipeline,
            i18n,
            names,
            delivery,
        })
    }

    /// Runs `command` and returns the text to print on success.
    ///
    /// # Errors
    ///
    /// Pipeline and delivery failures carry a localized message.
    pub async fn run(&self, command: &Command) -> AppResult<String> {
        info!(?command, "running");

        let guard = match command {
            Command::Weekly => self.pipeline.weekly().await,
            Command::Chart { country } => {
                let scope = Scope::parse(country)?;
                self.pipeline.chart(ChartMode::Monthly, &scope).await
            }
            Command::Csv { country } => self.pipeline.csv(&Scope::parse(country)?).await,
            Command::Report { country } => {
                let scope = Scope::parse(country)?;
                self.pipeline.report(&scope, &Local::now()).await
            }
            Command::Summary { country } => {
                let scope = Scope::parse(country)?;
                let summary = self
                    .pipeline
                    .summary(&scope)
                    .await
                    .map_err(|f| self.pipeline_error(f))?;
                return Ok(self.format_summary(&scope, &summary));
            }
        }
        .map_err(|f| self.pipeline_error(f))?;

        let delivered = self.deliver(guard).await?;
        let args = fluent_args!["path" => delivered.display().to_string()];
        Ok(self.i18n.text("delivered", args.as_ref()))
    }

    fn pipeline_error(&self, failure: PipelineFailure) -> AppError {
        AppError::Pipeline {
            message: failure.user_message(&self.i18n),
            failure,
        }
    }

    /// Copies the artifact to the delivery directory, then lets the guard
    /// delete the original unless it should be kept.
    async fn deliver(&self, guard: ArtifactGuard) -> AppResult<PathBuf> {
        let file_name = guard
            .path()
            .file_name()
            .map_or_else(|| PathBuf::from("artifact"), PathBuf::from);
        let target = self.delivery.directory.join(file_name);

        if same_file(guard.path(), &target).await {
            debug!(path = %target.display(), "artifact already at destination");
            guard.disarm();
            return Ok(target);
        }

        let copied = async {
            tokio::fs::create_dir_all(&self.delivery.directory).await?;
            tokio::fs::copy(guard.path(), &target).await
        }
        .await;
        if let Err(source) = copied {
            return Err(AppError::Delivery {
                message: self.i18n.text("failure-deliver", None),
                path: target,
                source,
            });
        }

        if self.delivery.keep {
            guard.disarm();
        } else {
            guard.release().await;
        }
        Ok(target)
    }

    fn format_summary(&self, scope: &Scope, summary: &SummaryFields) -> String {
        let country = match scope {
            Scope::World => self.i18n.text("scope-world", None),
            Scope::Country(id) => self
                .names
                .resolve(id, self.i18n.default_locale())
                .or_else(|| summary.country.clone())
                .unwrap_or_else(|| id.clone()),
        };
        let line = |key: &str, value: i64| {
            let args: Option<FluentArgs> = fluent_args!["value" => format_thousands(value)];
            self.i18n.text(key, args.as_ref())
        };
        let wide = |value: u64| i64::try_from(value).unwrap_or(i64::MAX);

        let heading = fluent_args!["country" => country];
        [
            self.i18n.text("summary-heading", heading.as_ref()),
            line("summary-population", wide(summary.population)),
            line("summary-active", summary.active),
            line("summary-critical", wide(summary.critical)),
            line("summary-recovered", wide(summary.recovered)),
            line("summary-cases", wide(summary.cases)),
            line("summary-deaths", wide(summary.deaths)),
            line("summary-tests", wide(summary.tests)),
        ]
        .join("\n")
    }
}

async fn same_file(a: &Path, b: &Path) -> bool {
    match (tokio::fs::canonicalize(a).await, tokio::fs::canonicalize(b).await) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("pipeline", &self.pipeline)
            .field("delivery", &self.delivery)
            .finish_non_exhaustive()
    }
}
