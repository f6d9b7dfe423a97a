//! Turns delta series into localized chart specifications.

use crate::types::{AxisSide, ChartMode, ChartSeries, ChartSpec, SeriesKind};
use c19_common::utils::format_source_date;
use c19_common::{DeltaPoint, Scope, Window};
use c19_config::ChartConfig;
use c19_i18n::{fluent_args, CountryNameResolver, I18nManager};
use std::sync::Arc;
use tracing::debug;

/// Builds [`ChartSpec`] values for the monthly and weekly charts.
#[derive(Clone)]
pub struct ChartConfigBuilder {
    chart: ChartConfig,
    i18n: Arc<I18nManager>,
    names: Arc<dyn CountryNameResolver>,
}

impl ChartConfigBuilder {
    /// Creates a builder using the chart section of the configuration.
    pub fn new(
        chart: ChartConfig,
        i18n: Arc<I18nManager>,
        names: Arc<dyn CountryNameResolver>,
    ) -> Self {
        Self { chart, i18n, names }
    }

    /// Name shown for `scope` in titles, in the default locale.
    ///
    /// Unknown countries fall back to the identifier the caller gave.
    #[must_use]
    pub fn display_name(&self, scope: &Scope) -> String {
        match scope {
            Scope::World => self.i18n.text("scope-world", None),
            Scope::Country(id) => self
                .names
                .resolve(id, self.i18n.default_locale())
                .unwrap_or_else(|| id.clone()),
        }
    }

    /// Window to fetch so that `mode` gets its configured number of deltas.
    #[must_use]
    pub const fn window(&self, mode: ChartMode) -> Window {
        match mode {
            ChartMode::Monthly => Window::for_deltas(self.chart.monthly_days),
            ChartMode::Weekly => Window::for_deltas(self.chart.weekly_days),
        }
    }

    /// Reference country of the weekly chart.
    #[must_use]
    pub fn weekly_scope(&self) -> Scope {
        Scope::Country(self.chart.weekly_country.clone())
    }

    /// Builds the chart for `mode`, or `None` when there is nothing to plot.
    #[must_use]
    pub fn from_deltas(
        &self,
        mode: ChartMode,
        scope: &Scope,
        deltas: &[DeltaPoint],
    ) -> Option<ChartSpec> {
        if deltas.is_empty() {
            debug!(%scope, ?mode, "no deltas, no chart");
            return None;
        }

        let country = self.display_name(scope);
        let labels = deltas.iter().map(|d| format_source_date(d.date)).collect();
        let cases: Vec<i64> = deltas.iter().map(|d| d.new_cases).collect();
        let args = fluent_args!["country" => country];

        let spec = match mode {
            ChartMode::Monthly => {
                let deaths = deltas.iter().map(|d| d.new_deaths).collect();
                ChartSpec::new(
                    mode,
                    self.i18n.text("chart-monthly-title", args.as_ref()),
                    labels,
                    vec![
                        ChartSeries::new(
                            self.i18n.text("series-cases", None),
                            SeriesKind::Bar,
                            AxisSide::Secondary,
                            &self.chart.cases_color,
                            cases,
                        ),
                        ChartSeries::new(
                            self.i18n.text("series-deaths", None),
                            SeriesKind::Line,
                            AxisSide::Primary,
                            &self.chart.deaths_color,
                            deaths,
                        ),
                    ],
                    Some(self.i18n.text("axis-people", None)),
                )
            }
            ChartMode::Weekly => ChartSpec::new(
                mode,
                self.i18n.text("chart-weekly-title", args.as_ref()),
                labels,
                vec![ChartSeries::new(
                    self.i18n.text("series-cases", None),
                    SeriesKind::Area,
                    AxisSide::Primary,
                    &self.chart.weekly_color,
                    cases,
                )],
                Some(self.i18n.text("axis-people", None)),
            ),
        };
        Some(spec)
    }
}

impl std::fmt::Debug for ChartConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartConfigBuilder")
            .field("chart", &self.chart)
            .field("locale", self.i18n.default_locale())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c19_common::test_utils::fixtures;
    use c19_i18n::{CountryDirectory, Locale};

    fn builder(locale: Locale) -> ChartConfigBuilder {
        ChartConfigBuilder::new(
            ChartConfig::default(),
            Arc::new(I18nManager::bundled(locale).unwrap()),
            Arc::new(CountryDirectory::bundled().unwrap()),
        )
    }

    fn deltas() -> Vec<DeltaPoint> {
        crate::to_deltas(&fixtures::cumulative_series(&[(100, 5), (120, 5), (150, 7)]))
    }

    #[test]
    fn empty_deltas_build_nothing() {
        let builder = builder(Locale::English);
        assert!(builder
            .from_deltas(ChartMode::Monthly, &Scope::World, &[])
            .is_none());
    }

    #[test]
    fn monthly_is_dual_axis_with_bars_and_line() {
        let spec = builder(Locale::English)
            .from_deltas(ChartMode::Monthly, &Scope::Country("jpn".into()), &deltas())
            .unwrap();

        assert_eq!(spec.title(), "Japan: new cases and deaths");
        assert_eq!(spec.labels(), ["1/23/20", "1/24/20"]);
        assert!(spec.is_dual_axis());

        let bars = spec.series_on(AxisSide::Secondary).next().unwrap();
        assert_eq!(bars.kind(), SeriesKind::Bar);
        assert_eq!(bars.values(), [20, 30]);
        assert_eq!(bars.color(), "#008080");

        let line = spec.series_on(AxisSide::Primary).next().unwrap();
        assert_eq!(line.kind(), SeriesKind::Line);
        assert_eq!(line.values(), [0, 2]);
    }

    #[test]
    fn weekly_is_a_single_area() {
        let builder = builder(Locale::English);
        let spec = builder
            .from_deltas(ChartMode::Weekly, &builder.weekly_scope(), &deltas())
            .unwrap();

        assert!(!spec.is_dual_axis());
        assert_eq!(spec.series().len(), 1);
        assert_eq!(spec.series()[0].kind(), SeriesKind::Area);
        assert_eq!(spec.series()[0].color(), "#0000FF");
    }

    #[test]
    fn unknown_country_keeps_raw_identifier() {
        let builder = builder(Locale::Japanese);
        assert_eq!(
            builder.display_name(&Scope::Country("Atlantis".into())),
            "Atlantis"
        );
        assert_eq!(builder.display_name(&Scope::Country("JP".into())), "日本");
        assert_eq!(builder.display_name(&Scope::World), "全世界");
    }

    #[test]
    fn windows_ask_for_one_extra_day() {
        let builder = builder(Locale::English);
        assert_eq!(builder.window(ChartMode::Monthly), Window::LastDays(31));
        assert_eq!(builder.window(ChartMode::Weekly), Window::LastDays(8));
    }
}
