//! Declarative chart description produced by the builder and consumed by the renderer.

use serde::{Deserialize, Serialize};

/// Which chart variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartMode {
    /// New cases as bars and deaths as a line over the last month, two y axes.
    Monthly,
    /// New cases as a filled area over the last week for the reference country.
    Weekly,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    /// Polyline with point markers.
    Line,
    /// Polyline filled down to zero.
    Area,
    /// One bar per label.
    Bar,
}

/// Which y axis a series is scaled against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisSide {
    /// Left axis.
    Primary,
    /// Right axis.
    Secondary,
}

/// One named series of values aligned with the chart labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    name: String,
    kind: SeriesKind,
    axis: AxisSide,
    color: String,
    values: Vec<i64>,
}

impl ChartSeries {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: SeriesKind,
        axis: AxisSide,
        color: impl Into<String>,
        values: Vec<i64>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            axis,
            color: color.into(),
            values,
        }
    }

    /// Legend text.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drawing style.
    #[must_use]
    pub const fn kind(&self) -> SeriesKind {
        self.kind
    }

    /// Axis the values are scaled against.
    #[must_use]
    pub const fn axis(&self) -> AxisSide {
        self.axis
    }

    /// `#RRGGBB` colour.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// One value per chart label.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

/// Immutable chart description: title, x labels and series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSpec {
    mode: ChartMode,
    title: String,
    labels: Vec<String>,
    series: Vec<ChartSeries>,
    axis_caption: Option<String>,
}

impl ChartSpec {
    pub(crate) fn new(
        mode: ChartMode,
        title: impl Into<String>,
        labels: Vec<String>,
        series: Vec<ChartSeries>,
        axis_caption: Option<String>,
    ) -> Self {
        Self {
            mode,
            title: title.into(),
            labels,
            series,
            axis_caption,
        }
    }

    /// Variant this spec was built for.
    #[must_use]
    pub const fn mode(&self) -> ChartMode {
        self.mode
    }

    /// Localized title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// X-axis labels, oldest first.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Every series in drawing order.
    #[must_use]
    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    /// Series scaled against `axis`.
    pub fn series_on(&self, axis: AxisSide) -> impl Iterator<Item = &ChartSeries> {
        self.series.iter().filter(move |s| s.axis == axis)
    }

    /// Whether any series uses the secondary axis.
    #[must_use]
    pub fn is_dual_axis(&self) -> bool {
        self.series_on(AxisSide::Secondary).next().is_some()
    }

    /// Unit caption shown next to the y axes.
    #[must_use]
    pub fn axis_caption(&self) -> Option<&str> {
        self.axis_caption.as_deref()
    }
}
