//! Integration tests for the c19-graphs pipeline components.

use c19_common::test_utils::{create_temp_dir, fixtures, mock_local_time};
use c19_common::{ArtifactKind, ErrorKind, Scope, Window};
use c19_config::{ChartConfig, NamingPolicy, OutputConfig, SourceConfig};
use c19_graphs::data_fetcher::parse_country_history;
use c19_graphs::{
    to_deltas, ArtifactGuard, ArtifactWriter, ChartConfigBuilder, ChartMode, ChartRenderer,
    CsvComposer, DataSource, TimeSeriesFetcher,
};
use c19_i18n::{CountryDirectory, I18nManager, Locale};
use std::sync::Arc;

#[tokio::test]
async fn unreachable_source_is_a_fetch_error() {
    let fetcher = TimeSeriesFetcher::new(&SourceConfig {
        base_url: "http://127.0.0.1:1/v3/covid-19/".to_string(),
        timeout_seconds: 2,
        ..SourceConfig::default()
    })
    .unwrap();

    let err = fetcher
        .fetch(&Scope::Country("Japan".into()), Window::LastDays(8))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);

    let err = fetcher.fetch_summary(&Scope::World).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
}

#[tokio::test]
async fn country_body_to_csv_file() {
    let deltas = to_deltas(&parse_country_history(fixtures::COUNTRY_HISTORY_BODY).unwrap());
    let csv = CsvComposer::to_csv(&deltas).unwrap();
    assert_eq!(
        csv,
        "Date,Cases,Deaths\n12/31/21,1501,1\n1/1/22,553,0\n1/2/22,589,1\n"
    );

    let dir = create_temp_dir();
    let writer = ArtifactWriter::new(&OutputConfig {
        directory: dir.path().to_path_buf(),
        naming: NamingPolicy::Timestamp,
    })
    .with_clock(|| mock_local_time(2022, 1, 3, 8, 0, 0));
    let scope = Scope::Country("Japan".into());
    let guard = ArtifactGuard::new(
        writer
            .persist_bytes(csv.as_bytes(), &CsvComposer::file_prefix(&scope), ArtifactKind::Csv)
            .await
            .unwrap(),
    );

    assert_eq!(guard.artifact().file_name(), Some("Japan-all-220103080000.csv"));
    assert_eq!(tokio::fs::read_to_string(guard.path()).await.unwrap(), csv);
    guard.release().await;
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn no_deltas_means_no_chart_and_no_image() {
    let builder = ChartConfigBuilder::new(
        ChartConfig::default(),
        Arc::new(I18nManager::bundled(Locale::English).unwrap()),
        Arc::new(CountryDirectory::bundled().unwrap()),
    );
    let single = to_deltas(&fixtures::cumulative_series(&[(555, 17)]));
    let spec = builder.from_deltas(ChartMode::Monthly, &Scope::World, &single);
    assert!(spec.is_none());

    let renderer = ChartRenderer::new(&ChartConfig::default()).unwrap();
    assert!(renderer.render(spec.as_ref()).unwrap().is_none());
}
