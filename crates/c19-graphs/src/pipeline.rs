//! Fetch → transform → build → render → write, with the failing stage recorded.

use crate::artifact::{ArtifactGuard, ArtifactWriter};
use crate::config_builder::ChartConfigBuilder;
use crate::csv_export::CsvComposer;
use crate::delta::to_deltas;
use crate::renderer::ChartRenderer;
use crate::report::ReportComposer;
use crate::traits::DataSource;
use crate::types::ChartMode;
use c19_common::{ArtifactKind, C19Error, ErrorKind, Scope, SummaryFields, Window};
use c19_config::C19Config;
use c19_i18n::{fluent_args, CountryNameResolver, I18nManager};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineStage {
    /// Waiting on the data source.
    Fetching,
    /// Computing daily increments.
    Transforming,
    /// Building the chart description.
    Building,
    /// Rasterizing the chart.
    Rendering,
    /// Persisting (and for reports, composing) the artifact.
    Writing,
    /// Finished successfully.
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Transforming => "transforming",
            Self::Building => "building",
            Self::Rendering => "rendering",
            Self::Writing => "writing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a run: the stage it stopped in and why.
#[derive(Debug, Error)]
#[error("{scope}: failed while {stage}: {error}")]
pub struct PipelineFailure {
    /// Stage that was active when the error happened.
    pub stage: PipelineStage,
    /// Artifact the run was producing, if any.
    pub artifact: Option<ArtifactKind>,
    /// Scope identifier of the run.
    pub scope: String,
    /// Underlying error.
    #[source]
    pub error: C19Error,
}

impl PipelineFailure {
    /// Classification of the underlying error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Short localized sentence for the user; never the error chain.
    #[must_use]
    pub fn user_message(&self, i18n: &I18nManager) -> String {
        let key = match (self.kind(), self.artifact) {
            (ErrorKind::Fetch, _) => "failure-fetch",
            (ErrorKind::EmptySeries, _) => {
                let args = fluent_args!["country" => self.scope.clone()];
                return i18n.text("failure-empty", args.as_ref());
            }
            (ErrorKind::Render | ErrorKind::Write | ErrorKind::Compose, Some(ArtifactKind::Png)) => {
                "failure-image"
            }
            (ErrorKind::Render | ErrorKind::Write | ErrorKind::Compose, Some(ArtifactKind::Pdf)) => {
                "failure-pdf"
            }
            (ErrorKind::Render | ErrorKind::Write | ErrorKind::Compose, Some(ArtifactKind::Csv)) => {
                "failure-csv"
            }
            _ => "failure-generic",
        };
        i18n.text(key, None)
    }
}

/// Result of a pipeline run.
pub type PipelineResult<T> = std::result::Result<T, PipelineFailure>;

/// Tracks the stage of one run and logs transitions.
struct Run<'a> {
    scope: &'a Scope,
    artifact: Option<ArtifactKind>,
    stage: PipelineStage,
}

impl<'a> Run<'a> {
    fn start(scope: &'a Scope, artifact: Option<ArtifactKind>) -> Self {
        debug!(%scope, ?artifact, stage = %PipelineStage::Fetching, "run started");
        Self {
            scope,
            artifact,
            stage: PipelineStage::Fetching,
        }
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug!(scope = %self.scope, from = %self.stage, to = %stage, "stage transition");
        self.stage = stage;
    }

    fn fail(&self, error: C19Error) -> PipelineFailure {
        warn!(
            scope = %self.scope,
            stage = %self.stage,
            kind = %error.kind(),
            "run failed: {error}"
        );
        PipelineFailure {
            stage: self.stage,
            artifact: self.artifact,
            scope: self.scope.id().to_string(),
            error,
        }
    }
}

/// The assembled components plus the flows that drive them.
pub struct ReportPipeline {
    source: Arc<dyn DataSource>,
    builder: ChartConfigBuilder,
    renderer: Arc<ChartRenderer>,
    writer: ArtifactWriter,
    composer: ReportComposer,
}

impl ReportPipeline {
    /// Wires every component from `config`.
    ///
    /// # Errors
    ///
    /// Fails when the chart theme cannot be built from the configuration.
    pub fn new(
        config: &C19Config,
        source: Arc<dyn DataSource>,
        i18n: Arc<I18nManager>,
        names: Arc<dyn CountryNameResolver>,
    ) -> c19_common::Result<Self> {
        let writer = ArtifactWriter::new(&config.output);
        Ok(Self {
            source,
            builder: ChartConfigBuilder::new(
                config.chart.clone(),
                Arc::clone(&i18n),
                Arc::clone(&names),
            ),
            renderer: Arc::new(ChartRenderer::new(&config.chart)?),
            composer: ReportComposer::new(config.report.clone(), writer.clone(), i18n, names),
            writer,
        })
    }

    /// Chart builder in use, for display names and windows.
    #[must_use]
    pub const fn builder(&self) -> &ChartConfigBuilder {
        &self.builder
    }

    /// Renders the `mode` chart for `scope` to a PNG.
    ///
    /// # Errors
    ///
    /// Returns the stage and cause of the first failure. No deltas is an
    /// empty-series failure in the building stage.
    pub async fn chart(&self, mode: ChartMode, scope: &Scope) -> PipelineResult<ArtifactGuard> {
        let mut run = Run::start(scope, Some(ArtifactKind::Png));

        let points = self
            .source
            .fetch(scope, self.builder.window(mode))
            .await
            .map_err(|e| run.fail(e))?;

        run.enter(PipelineStage::Transforming);
        let deltas = to_deltas(&points);

        run.enter(PipelineStage::Building);
        let spec = self
            .builder
            .from_deltas(mode, scope, &deltas)
            .ok_or_else(|| run.fail(C19Error::empty_series(scope.id())))?;

        run.enter(PipelineStage::Rendering);
        let renderer = Arc::clone(&self.renderer);
        let png = tokio::task::spawn_blocking(move || renderer.render(Some(&spec)))
            .await
            .map_err(|e| run.fail(C19Error::render_with_source("render task failed", e)))?
            .map_err(|e| run.fail(e))?
            .ok_or_else(|| run.fail(C19Error::render("renderer produced no image")))?;

        run.enter(PipelineStage::Writing);
        let artifact = self
            .writer
            .persist_bytes(&png, "chart", ArtifactKind::Png)
            .await
            .map_err(|e| run.fail(e))?;

        run.enter(PipelineStage::Done);
        info!(path = %artifact.path().display(), "chart ready");
        Ok(ArtifactGuard::new(artifact))
    }

    /// Renders the weekly chart for the configured reference country.
    ///
    /// # Errors
    ///
    /// See [`ReportPipeline::chart`].
    pub async fn weekly(&self) -> PipelineResult<ArtifactGuard> {
        let scope = self.builder.weekly_scope();
        self.chart(ChartMode::Weekly, &scope).await
    }

    /// Exports the full delta history of `scope` as CSV.
    ///
    /// A series with fewer than two points produces a header-only file.
    ///
    /// # Errors
    ///
    /// Fetch, compose and write failures, tagged with their stage.
    pub async fn csv(&self, scope: &Scope) -> PipelineResult<ArtifactGuard> {
        let mut run = Run::start(scope, Some(ArtifactKind::Csv));

        let points = self
            .source
            .fetch(scope, Window::All)
            .await
            .map_err(|e| run.fail(e))?;

        run.enter(PipelineStage::Transforming);
        let deltas = to_deltas(&points);

        run.enter(PipelineStage::Writing);
        let text = CsvComposer::to_csv(&deltas).map_err(|e| run.fail(e))?;
        let artifact = self
            .writer
            .persist_bytes(text.as_bytes(), &CsvComposer::file_prefix(scope), ArtifactKind::Csv)
            .await
            .map_err(|e| run.fail(e))?;

        run.enter(PipelineStage::Done);
        info!(path = %artifact.path().display(), rows = deltas.len(), "csv ready");
        Ok(ArtifactGuard::new(artifact))
    }

    /// Builds the PDF report: monthly chart, optional summary table.
    ///
    /// The intermediate PNG is removed once the PDF exists or the run fails.
    /// A failed summary lookup only drops the table.
    ///
    /// # Errors
    ///
    /// Chart failures are reported against the PNG, composition failures
    /// against the PDF.
    pub async fn report(
        &self,
        scope: &Scope,
        generated_at: &DateTime<Local>,
    ) -> PipelineResult<ArtifactGuard> {
        let chart = self.chart(ChartMode::Monthly, scope).await?;

        let summary = match self.source.fetch_summary(scope).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(%scope, "summary unavailable, report without table: {e}");
                None
            }
        };

        let mut run = Run::start(scope, Some(ArtifactKind::Pdf));
        run.enter(PipelineStage::Writing);
        let composed = self
            .composer
            .compose(generated_at, scope, chart.path(), summary.as_ref())
            .await;
        chart.release().await;
        let artifact = composed.map_err(|e| run.fail(e))?;

        run.enter(PipelineStage::Done);
        info!(path = %artifact.path().display(), "report ready");
        Ok(ArtifactGuard::new(artifact))
    }

    /// Fetches the current summary figures for `scope`.
    ///
    /// # Errors
    ///
    /// A fetch failure, tagged with the fetching stage.
    pub async fn summary(&self, scope: &Scope) -> PipelineResult<SummaryFields> {
        let mut run = Run::start(scope, None);
        let summary = self
            .source
            .fetch_summary(scope)
            .await
            .map_err(|e| run.fail(e))?;
        run.enter(PipelineStage::Done);
        Ok(summary)
    }
}

impl fmt::Debug for ReportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportPipeline")
            .field("builder", &self.builder)
            .field("renderer", &self.renderer)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockDataSource;
    use c19_common::test_utils::{create_temp_dir, fixtures, init_test_logging};
    use c19_i18n::{CountryDirectory, Locale};
    use tempfile::TempDir;

    fn pipeline(source: MockDataSource, locale: Locale) -> (ReportPipeline, TempDir) {
        init_test_logging();
        let dir = create_temp_dir();
        let mut config = C19Config::default();
        config.output.directory = dir.path().to_path_buf();
        let pipeline = ReportPipeline::new(
            &config,
            Arc::new(source),
            Arc::new(I18nManager::bundled(locale).unwrap()),
            Arc::new(CountryDirectory::bundled().unwrap()),
        )
        .unwrap();
        (pipeline, dir)
    }

    #[tokio::test]
    async fn csv_flow_writes_full_history() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|scope, window| scope.id() == "Japan" && *window == Window::All)
            .times(1)
            .returning(|_, _| Ok(fixtures::cumulative_series(&[(100, 1), (120, 1), (150, 4)])));

        let (pipeline, _dir) = pipeline(source, Locale::English);
        let guard = pipeline.csv(&Scope::Country("Japan".into())).await.unwrap();

        let text = std::fs::read_to_string(guard.path()).unwrap();
        assert_eq!(text, "Date,Cases,Deaths\n1/23/20,20,0\n1/24/20,30,3\n");
        assert!(guard.artifact().file_name().unwrap().starts_with("Japan-all-"));

        let path = guard.path().to_path_buf();
        drop(guard);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn fetch_failure_stops_in_fetching() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(C19Error::fetch_with_status("503 from source", 503)));

        let (pipeline, _dir) = pipeline(source, Locale::Japanese);
        let failure = pipeline
            .chart(ChartMode::Monthly, &Scope::World)
            .await
            .unwrap_err();

        assert_eq!(failure.stage, PipelineStage::Fetching);
        assert_eq!(failure.kind(), ErrorKind::Fetch);
        assert_eq!(failure.error.status(), Some(503));
    }

    #[tokio::test]
    async fn single_point_is_an_empty_series_while_building() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|_, window| *window == Window::LastDays(31))
            .returning(|_, _| Ok(fixtures::cumulative_series(&[(100, 1)])));

        let (pipeline, dir) = pipeline(source, Locale::English);
        let failure = pipeline
            .chart(ChartMode::Monthly, &Scope::Country("Japan".into()))
            .await
            .unwrap_err();

        assert_eq!(failure.stage, PipelineStage::Building);
        assert_eq!(failure.kind(), ErrorKind::EmptySeries);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn weekly_uses_reference_country_and_eight_days() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|scope, window| scope.id() == "Japan" && *window == Window::LastDays(8))
            .times(1)
            .returning(|_, _| Ok(fixtures::cumulative_series(&[(1, 0), (3, 0), (6, 1)])));

        let (pipeline, _dir) = pipeline(source, Locale::English);
        match pipeline.weekly().await {
            Ok(guard) => assert!(guard.path().is_file()),
            Err(failure) => {
                assert_eq!(failure.stage, PipelineStage::Rendering);
                assert_eq!(failure.kind(), ErrorKind::Render);
            }
        }
    }

    #[tokio::test]
    async fn report_survives_missing_summary_and_removes_chart() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|scope, window| scope.id() == "Japan" && *window == Window::LastDays(31))
            .times(1)
            .returning(|_, _| Ok(fixtures::cumulative_series(&[(10, 0), (25, 1), (45, 1), (80, 3)])));
        source
            .expect_fetch_summary()
            .returning(|_| Err(C19Error::fetch_with_status("summary down", 502)));

        let (pipeline, dir) = pipeline(source, Locale::English);
        let generated_at = c19_common::test_utils::mock_local_time(2022, 1, 3, 8, 0, 0);
        let files = |dir: &TempDir| -> Vec<String> {
            std::fs::read_dir(dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect()
        };

        match pipeline
            .report(&Scope::Country("Japan".into()), &generated_at)
            .await
        {
            Ok(guard) => {
                assert_eq!(guard.artifact().kind, ArtifactKind::Pdf);
                assert!(std::fs::read(guard.path()).unwrap().starts_with(b"%PDF"));

                let names = files(&dir);
                assert_eq!(names.len(), 1, "left behind: {names:?}");
                assert!(names[0].starts_with("Report-Japan-") && names[0].ends_with(".pdf"));

                guard.release().await;
                assert!(files(&dir).is_empty());
            }
            Err(failure) => {
                assert_eq!(failure.stage, PipelineStage::Rendering);
                assert_eq!(failure.artifact, Some(ArtifactKind::Png));
                assert!(files(&dir).is_empty());
            }
        }
    }

    #[tokio::test]
    async fn summary_passes_fields_through() {
        let mut source = MockDataSource::new();
        source.expect_fetch_summary().returning(|_| {
            Ok(serde_json::from_str(fixtures::COUNTRY_SUMMARY_BODY).unwrap())
        });

        let (pipeline, _dir) = pipeline(source, Locale::English);
        let summary = pipeline.summary(&Scope::Country("JP".into())).await.unwrap();
        assert_eq!(summary.population, 126_050_796);
        assert_eq!(summary.country.as_deref(), Some("Japan"));
    }

    #[test]
    fn user_messages_follow_kind_and_artifact() {
        let i18n = I18nManager::bundled(Locale::Japanese).unwrap();
        let failure = |error: C19Error, artifact| PipelineFailure {
            stage: PipelineStage::Writing,
            artifact,
            scope: "Japan".to_string(),
            error,
        };

        assert_eq!(
            failure(C19Error::render("x"), Some(ArtifactKind::Png)).user_message(&i18n),
            "画像ファイルは作成できませんでした。"
        );
        assert_eq!(
            failure(C19Error::compose("x"), Some(ArtifactKind::Pdf)).user_message(&i18n),
            "PDFファイルは作成できませんでした。"
        );
        assert_eq!(
            failure(C19Error::config("x"), None).user_message(&i18n),
            "エラーが発生しました。"
        );
        assert!(failure(C19Error::empty_series("Japan"), Some(ArtifactKind::Png))
            .user_message(&i18n)
            .contains("Japan"));
    }
}
