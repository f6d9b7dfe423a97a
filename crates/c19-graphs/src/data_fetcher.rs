//! HTTP client for the historical time-series API.

use crate::traits::DataSource;
use async_trait::async_trait;
use c19_common::utils::parse_source_date;
use c19_common::{C19Error, CumulativePoint, Result, Scope, SummaryFields, Window};
use c19_config::SourceConfig;
use indexmap::IndexMap;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Date-keyed totals exactly as the source orders them.
#[derive(Debug, Deserialize)]
struct TimelineMaps {
    cases: IndexMap<String, u64>,
    deaths: IndexMap<String, u64>,
}

/// Body of `/historical/{country}`.
#[derive(Debug, Deserialize)]
struct CountryHistory {
    timeline: TimelineMaps,
}

/// Time-series client with a pooled connection and a fixed base URL.
#[derive(Debug, Clone)]
pub struct TimeSeriesFetcher {
    client: Client,
    base_url: Url,
}

impl TimeSeriesFetcher {
    /// Creates a fetcher from the source section of the configuration.
    ///
    /// # Errors
    ///
    /// Fails when the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            C19Error::config_with_source(format!("invalid base URL '{}'", config.base_url), e)
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| C19Error::config_with_source("could not build HTTP client", e))?;

        Ok(Self { client, base_url })
    }

    /// Base URL every request is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the historical series for `scope`.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot carry path segments.
    pub fn history_url(&self, scope: &Scope, window: Window) -> Result<Url> {
        let mut url = self.url_with_segments(&["historical", scope.id()])?;
        url.query_pairs_mut()
            .append_pair("lastdays", &window.query_value());
        Ok(url)
    }

    /// URL of the summary figures for `scope`.
    ///
    /// # Errors
    ///
    /// Fails when the base URL cannot carry path segments.
    pub fn summary_url(&self, scope: &Scope) -> Result<Url> {
        match scope {
            Scope::World => self.url_with_segments(&[Scope::WORLD_ID]),
            Scope::Country(id) => self.url_with_segments(&["countries", id]),
        }
    }

    fn url_with_segments(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| C19Error::config(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "requesting");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(C19Error::fetch_with_status(
                format!("{url} answered {status}"),
                status.as_u16(),
            ));
        }
        Ok(response.json::<T>().await?)
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        debug!(%url, "requesting");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(C19Error::fetch_with_status(
                format!("{url} answered {status}"),
                status.as_u16(),
            ));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl DataSource for TimeSeriesFetcher {
    #[instrument(skip_all, fields(scope = %scope, window = %window))]
    async fn fetch(&self, scope: &Scope, window: Window) -> Result<Vec<CumulativePoint>> {
        let url = self.history_url(scope, window)?;
        // Date keys must reach the IndexMap in body order, so no Value detour.
        let body = self.get_text(url).await?;
        let points = if scope.is_world() {
            parse_world_history(&body)?
        } else {
            parse_country_history(&body)?
        };
        debug!(points = points.len(), "fetched cumulative series");
        Ok(points)
    }

    #[instrument(skip_all, fields(scope = %scope))]
    async fn fetch_summary(&self, scope: &Scope) -> Result<SummaryFields> {
        let url = self.summary_url(scope)?;
        self.get_json(url).await
    }
}

/// Parses the world body: `{"cases": {...}, "deaths": {...}}`.
///
/// # Errors
///
/// Fails when the shape is wrong, a date does not parse, or a case date has
/// no matching death total.
pub fn parse_world_history(body: &str) -> Result<Vec<CumulativePoint>> {
    let maps: TimelineMaps = serde_json::from_str(body)
        .map_err(|e| C19Error::fetch_with_source("unexpected world history body", e))?;
    zip_timeline(maps)
}

/// Parses a country body: `{"country": ..., "timeline": {"cases": ..., "deaths": ...}}`.
///
/// # Errors
///
/// Same conditions as [`parse_world_history`].
pub fn parse_country_history(body: &str) -> Result<Vec<CumulativePoint>> {
    let history: CountryHistory = serde_json::from_str(body)
        .map_err(|e| C19Error::fetch_with_source("unexpected country history body", e))?;
    zip_timeline(history.timeline)
}

fn zip_timeline(maps: TimelineMaps) -> Result<Vec<CumulativePoint>> {
    maps.cases
        .iter()
        .map(|(raw_date, &cases)| {
            let date = parse_source_date(raw_date)
                .ok_or_else(|| C19Error::fetch(format!("unparseable date '{raw_date}'")))?;
            let deaths = maps
                .deaths
                .get(raw_date)
                .copied()
                .ok_or_else(|| C19Error::fetch(format!("no death total for {raw_date}")))?;
            Ok(CumulativePoint::new(date, cases, deaths))
        })
        .collect()
}
