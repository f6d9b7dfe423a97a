//! Rasterizes a [`ChartSpec`] into PNG bytes.

use crate::types::{AxisSide, ChartSeries, ChartSpec, SeriesKind};
use c19_common::utils::format_thousands;
use c19_common::{C19Error, Result};
use c19_config::{is_hex_color, ChartConfig};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::element::DynElement;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters_bitmap::BitMapBackend;
use std::ops::Range;
use tracing::{debug, instrument};

type Point = (SegmentValue<usize>, f64);

/// Fonts, colours and raster size shared by every chart a renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartTheme {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Font family for every text element.
    pub font_family: String,
    /// Fill behind the plot.
    pub background: RGBColor,
    /// Text, axes and grid.
    pub foreground: RGBColor,
    /// Title size in pixels.
    pub title_size: u32,
    /// Legend and axis caption size in pixels.
    pub legend_size: u32,
    /// X tick label size in pixels.
    pub x_tick_size: u32,
    /// Y tick label size in pixels.
    pub y_tick_size: u32,
}

impl ChartTheme {
    /// Theme for the configured raster size and colours.
    ///
    /// # Errors
    ///
    /// Fails when a colour is not `#RRGGBB`.
    pub fn from_config(config: &ChartConfig) -> Result<Self> {
        Ok(Self {
            width: config.width,
            height: config.height,
            font_family: config.font_family.clone(),
            background: parse_hex_color(&config.background_color)?,
            foreground: parse_hex_color(&config.font_color)?,
            title_size: 60,
            legend_size: 36,
            x_tick_size: 32,
            y_tick_size: 24,
        })
    }

    fn font(&self, size: u32) -> TextStyle<'_> {
        (self.font_family.as_str(), size).into_font().color(&self.foreground)
    }
}

/// Stateless PNG renderer; safe to share across tasks.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    theme: ChartTheme,
}

impl ChartRenderer {
    /// Creates a renderer from the chart configuration.
    ///
    /// # Errors
    ///
    /// Fails when a configured colour does not parse.
    pub fn new(config: &ChartConfig) -> Result<Self> {
        Ok(Self {
            theme: ChartTheme::from_config(config)?,
        })
    }

    /// Theme in use.
    #[must_use]
    pub const fn theme(&self) -> &ChartTheme {
        &self.theme
    }

    /// Renders `spec` to PNG. No spec means no chart, which is not an error.
    ///
    /// # Errors
    ///
    /// Drawing and encoding failures are returned as render errors.
    #[instrument(skip_all, fields(title = spec.map(ChartSpec::title)))]
    pub fn render(&self, spec: Option<&ChartSpec>) -> Result<Option<Vec<u8>>> {
        let Some(spec) = spec else {
            debug!("nothing to render");
            return Ok(None);
        };

        let (width, height) = (self.theme.width, self.theme.height);
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            self.draw(&root, spec)?;
            root.present()?;
        }

        let png = encode_png(&pixels, width, height)?;
        debug!(bytes = png.len(), "chart rendered");
        Ok(Some(png))
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn draw(&self, root: &DrawingArea<BitMapBackend<'_>, Shift>, spec: &ChartSpec) -> Result<()> {
        let theme = &self.theme;
        root.fill(&theme.background)?;

        let labels = spec.labels();
        let count = labels.len();
        let dual = spec.is_dual_axis();
        let primary = value_range(spec.series_on(AxisSide::Primary));
        let secondary = if dual {
            value_range(spec.series_on(AxisSide::Secondary))
        } else {
            primary.clone()
        };

        let mut chart = ChartBuilder::on(root)
            .caption(spec.title(), theme.font(theme.title_size))
            .margin(40)
            .x_label_area_size(160)
            .y_label_area_size(180)
            .right_y_label_area_size(if dual { 180 } else { 0 })
            .build_cartesian_2d((0..count).into_segmented(), primary)?
            .set_secondary_coord((0..count).into_segmented(), secondary);

        let x_label = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let y_label = |v: &f64| format_thousands(v.round() as i64);
        let x_style = TextStyle::from(
            (theme.font_family.as_str(), theme.x_tick_size)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .color(&theme.foreground);
        let caption = spec.axis_caption().unwrap_or_default();

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(theme.foreground.mix(0.15).stroke_width(1))
            .light_line_style(theme.background.stroke_width(0))
            .axis_style(theme.foreground.stroke_width(2))
            .x_labels(count)
            .x_label_formatter(&x_label)
            .x_label_style(x_style)
            .y_label_formatter(&y_label)
            .y_label_style(theme.font(theme.y_tick_size))
            .y_desc(caption)
            .axis_desc_style(theme.font(theme.legend_size))
            .draw()?;

        if dual {
            chart
                .configure_secondary_axes()
                .axis_style(theme.foreground.stroke_width(2))
                .y_label_formatter(&y_label)
                .label_style(theme.font(theme.y_tick_size))
                .y_desc(caption)
                .axis_desc_style(theme.font(theme.legend_size))
                .draw()?;
        }

        // Bars first so lines stay visible on top.
        let mut ordered: Vec<&ChartSeries> = spec.series().iter().collect();
        ordered.sort_by_key(|s| s.kind() != SeriesKind::Bar);

        for series in ordered {
            let color = parse_hex_color(series.color())
                .map_err(|e| C19Error::render_with_source("bad series colour", e))?;
            let elements = series_elements::<BitMapBackend<'_>>(series, color);
            let anno = match series.axis() {
                AxisSide::Primary => chart.draw_series(elements)?,
                AxisSide::Secondary => chart.draw_secondary_series(elements)?,
            };
            anno.label(series.name()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 12), (x + 36, y + 12)], color.filled())
            });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(theme.font(theme.legend_size))
            .background_style(theme.background.mix(0.85).filled())
            .border_style(theme.foreground.stroke_width(1))
            .draw()?;

        Ok(())
    }
}

/// Elements for one series in segment coordinates.
#[allow(clippy::cast_precision_loss)]
fn series_elements<'e, DB: DrawingBackend>(
    series: &ChartSeries,
    color: RGBColor,
) -> Vec<DynElement<'e, DB, Point>> {
    let points: Vec<Point> = series
        .values()
        .iter()
        .enumerate()
        .map(|(i, &v)| (SegmentValue::CenterOf(i), v as f64))
        .collect();

    match series.kind() {
        SeriesKind::Bar => series
            .values()
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v as f64)],
                    color.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar.into_dyn()
            })
            .collect(),
        SeriesKind::Line => {
            let mut elements = vec![PathElement::new(points.clone(), color.stroke_width(4)).into_dyn()];
            elements.extend(
                points
                    .into_iter()
                    .map(|p| Circle::new(p, 7, color.filled()).into_dyn()),
            );
            elements
        }
        SeriesKind::Area => {
            let outline = PathElement::new(points.clone(), color.stroke_width(3)).into_dyn();
            let mut polygon = points;
            if let (Some(first), Some(last)) = (polygon.first().cloned(), polygon.last().cloned()) {
                polygon.push((last.0, 0.0));
                polygon.push((first.0, 0.0));
            }
            vec![Polygon::new(polygon, color.mix(0.35).filled()).into_dyn(), outline]
        }
    }
}

/// Y range covering zero and every value, with headroom above.
#[allow(clippy::cast_precision_loss)]
fn value_range<'a>(series: impl Iterator<Item = &'a ChartSeries>) -> Range<f64> {
    let (low, high) = series
        .flat_map(|s| s.values().iter().copied())
        .fold((0i64, 0i64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = (high - low).max(1) as f64;
    let floor = if low < 0 { low as f64 - span * 0.05 } else { 0.0 };
    floor..(high as f64 + span * 0.1)
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(pixels, width, height, ColorType::Rgb8)
        .map_err(|e| C19Error::render_with_source("PNG encoding failed", e))?;
    Ok(png)
}

/// Parses `#RRGGBB`.
///
/// # Errors
///
/// Returns a validation error for anything else.
pub fn parse_hex_color(value: &str) -> Result<RGBColor> {
    let channel = |at: usize| u8::from_str_radix(&value[at..at + 2], 16).ok();
    if is_hex_color(value) {
        if let (Some(r), Some(g), Some(b)) = (channel(1), channel(3), channel(5)) {
            return Ok(RGBColor(r, g, b));
        }
    }
    Err(C19Error::validation(
        format!("'{value}' is not a #RRGGBB colour"),
        None,
    ))
}
