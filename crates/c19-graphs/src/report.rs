//! Single-page PDF report around a rendered chart.

use crate::artifact::ArtifactWriter;
use c19_common::utils::{format_report_time, format_thousands};
use c19_common::{Artifact, ArtifactKind, C19Error, Result, Scope, SummaryFields};
use c19_config::ReportConfig;
use c19_i18n::{fluent_args, CountryNameResolver, I18nManager};
use chrono::{DateTime, Local};
use printpdf::image_crate::{self, ImageFormat};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Pt, Rgb,
};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, instrument};

const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;
const MARGIN: f32 = 50.0;
const IMAGE_DPI: f32 = 300.0;
const TABLE_COLUMN: f32 = 200.0;
const TABLE_ROW: f32 = 26.0;
const TABLE_FONT: f32 = 14.0;

/// Text blocks of one report, already localized.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReportText {
    title: String,
    generated: String,
    table: Option<[[String; 2]; 2]>,
    subtitle: String,
}

/// Lays out and persists the PDF report.
#[derive(Clone)]
pub struct ReportComposer {
    layout: ReportConfig,
    writer: ArtifactWriter,
    i18n: Arc<I18nManager>,
    names: Arc<dyn CountryNameResolver>,
}

impl ReportComposer {
    /// Creates a composer writing through `writer`.
    pub fn new(
        layout: ReportConfig,
        writer: ArtifactWriter,
        i18n: Arc<I18nManager>,
        names: Arc<dyn CountryNameResolver>,
    ) -> Self {
        Self {
            layout,
            writer,
            i18n,
            names,
        }
    }

    /// File prefix of the report for `scope`.
    #[must_use]
    pub fn file_prefix(scope: &Scope) -> String {
        format!("Report-{}", scope.id())
    }

    /// Builds the report for `scope` around the PNG at `chart_image_path`
    /// and writes it as `Report-{country}-{timestamp}.pdf`.
    ///
    /// Without a summary the table is left out.
    ///
    /// # Errors
    ///
    /// Unreadable or undecodable images, font problems and PDF serialization
    /// failures are compose errors; persisting is a write error.
    #[instrument(skip_all, fields(scope = %scope, image = %chart_image_path.display()))]
    pub async fn compose(
        &self,
        generated_at: &DateTime<Local>,
        scope: &Scope,
        chart_image_path: &Path,
        summary: Option<&SummaryFields>,
    ) -> Result<Artifact> {
        let png = tokio::fs::read(chart_image_path).await.map_err(|e| {
            C19Error::compose_with_source(
                format!("cannot read chart image {}", chart_image_path.display()),
                e,
            )
        })?;
        let font = match &self.layout.font_path {
            Some(path) => Some(tokio::fs::read(path).await.map_err(|e| {
                C19Error::compose_with_source(format!("cannot read font {}", path.display()), e)
            })?),
            None => None,
        };

        let text = self.report_text(generated_at, scope, summary);
        let bytes = build_document(&self.layout, &text, &png, font.as_deref())?;
        debug!(bytes = bytes.len(), "report assembled");

        self.writer
            .persist_bytes(&bytes, &Self::file_prefix(scope), ArtifactKind::Pdf)
            .await
    }

    fn report_text(
        &self,
        generated_at: &DateTime<Local>,
        scope: &Scope,
        summary: Option<&SummaryFields>,
    ) -> ReportText {
        let datetime = fluent_args!["datetime" => format_report_time(generated_at)];
        let table = summary.map(|fields| {
            let country = match scope {
                Scope::World => self.i18n.text("scope-world", None),
                Scope::Country(id) => self
                    .names
                    .resolve(id, self.i18n.default_locale())
                    .or_else(|| fields.country.clone())
                    .unwrap_or_else(|| id.clone()),
            };
            [
                [
                    self.i18n.text("report-table-country", None),
                    self.i18n.text("report-table-population", None),
                ],
                [
                    country,
                    format_thousands(i64::try_from(fields.population).unwrap_or(i64::MAX)),
                ],
            ]
        });

        ReportText {
            title: self.i18n.text("report-title", None),
            generated: self.i18n.text("report-generated-at", datetime.as_ref()),
            table,
            subtitle: self.i18n.text("report-chart-subtitle", None),
        }
    }
}

impl std::fmt::Debug for ReportComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportComposer")
            .field("layout", &self.layout)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

fn pdf_error(what: &str, err: impl std::fmt::Display) -> C19Error {
    C19Error::compose(format!("{what}: {err}"))
}

fn build_document(
    layout: &ReportConfig,
    text: &ReportText,
    png: &[u8],
    font: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let chart = image_crate::load_from_memory_with_format(png, ImageFormat::Png)
        .map_err(|e| C19Error::compose_with_source("chart image is not a PNG", e))?;

    let (doc, page, layer) = PdfDocument::new(
        &text.title,
        Mm::from(Pt(PAGE_WIDTH)),
        Mm::from(Pt(PAGE_HEIGHT)),
        "report",
    );
    let font = load_font(&doc, font)?;
    let layer = doc.get_page(page).get_layer(layer);
    set_fill(&layer, (0.0, 0.0, 0.0));

    let mut y = PAGE_HEIGHT - MARGIN - 24.0;
    centered_text(&layer, &font, &text.title, 24.0, y);

    y -= 36.0;
    let generated_width = text_width(&text.generated, 16.0);
    place_text(&layer, &font, &text.generated, 16.0, PAGE_WIDTH - MARGIN - generated_width, y);

    if let Some(rows) = &text.table {
        y -= 24.0;
        y = draw_table(&layer, &font, rows, y);
    }

    y -= 40.0;
    place_text(&layer, &font, &text.subtitle, 20.0, MARGIN, y);

    y -= 16.0 + layout.image_height_pt;
    place_chart(&layer, &chart, layout, y);

    doc.save_to_bytes()
        .map_err(|e| pdf_error("could not serialize PDF", e))
}

fn load_font(doc: &PdfDocumentReference, font: Option<&[u8]>) -> Result<IndirectFontRef> {
    match font {
        Some(bytes) => doc
            .add_external_font(Cursor::new(bytes))
            .map_err(|e| pdf_error("could not load font", e)),
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_error("could not load builtin font", e)),
    }
}

/// Returns the y coordinate under the table.
fn draw_table(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    rows: &[[String; 2]; 2],
    top: f32,
) -> f32 {
    let left = (PAGE_WIDTH - 2.0 * TABLE_COLUMN) / 2.0;
    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(0.75);

    for (row_index, row) in rows.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let row_top = top - TABLE_ROW * row_index as f32;
        for (column_index, cell) in row.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = left + TABLE_COLUMN * column_index as f32;
            let header = row_index == 0;
            if header {
                set_fill(layer, (238.0 / 255.0, 238.0 / 255.0, 1.0));
            }
            layer.add_polygon(rectangle(
                x,
                row_top - TABLE_ROW,
                TABLE_COLUMN,
                TABLE_ROW,
                if header { PaintMode::FillStroke } else { PaintMode::Stroke },
            ));
            set_fill(layer, (0.0, 0.0, 0.0));

            let inset = (TABLE_COLUMN - text_width(cell, TABLE_FONT)) / 2.0;
            place_text(
                layer,
                font,
                cell,
                TABLE_FONT,
                x + inset.max(4.0),
                row_top - TABLE_ROW + (TABLE_ROW - TABLE_FONT) / 2.0 + 3.0,
            );
        }
    }
    top - TABLE_ROW * 2.0
}

#[allow(clippy::cast_precision_loss)]
fn place_chart(
    layer: &PdfLayerReference,
    chart: &image_crate::DynamicImage,
    layout: &ReportConfig,
    bottom: f32,
) {
    let natural_width = chart.width() as f32 * 72.0 / IMAGE_DPI;
    let natural_height = chart.height() as f32 * 72.0 / IMAGE_DPI;
    let left = (PAGE_WIDTH - layout.image_width_pt) / 2.0;

    Image::from_dynamic_image(chart).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm::from(Pt(left))),
            translate_y: Some(Mm::from(Pt(bottom))),
            scale_x: Some(layout.image_width_pt / natural_width),
            scale_y: Some(layout.image_height_pt / natural_height),
            dpi: Some(IMAGE_DPI),
            ..ImageTransform::default()
        },
    );
}

fn rectangle(x: f32, y: f32, width: f32, height: f32, mode: PaintMode) -> Polygon {
    let corner = |px: f32, py: f32| (Point::new(Mm::from(Pt(px)), Mm::from(Pt(py))), false);
    Polygon {
        rings: vec![vec![
            corner(x, y),
            corner(x + width, y),
            corner(x + width, y + height),
            corner(x, y + height),
        ]],
        mode,
        winding_order: WindingOrder::NonZero,
    }
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (f32, f32, f32)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
}

fn centered_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f32, y: f32) {
    let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
    place_text(layer, font, text, size, x.max(MARGIN), y);
}

fn place_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, size, Mm::from(Pt(x)), Mm::from(Pt(y)), font);
}

/// Rough advance width; exact metrics are not needed for alignment.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| if c.is_ascii() { 0.55 * size } else { size })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use c19_common::test_utils::{create_temp_dir, mock_local_time};
    use c19_config::{NamingPolicy, OutputConfig};
    use c19_i18n::{CountryDirectory, Locale};

    fn tiny_png() -> Vec<u8> {
        let image = image_crate::RgbImage::from_pixel(60, 40, image_crate::Rgb([0, 128, 128]));
        let mut bytes = Vec::new();
        image_crate::DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn composer(dir: &Path) -> ReportComposer {
        let writer = ArtifactWriter::new(&OutputConfig {
            directory: dir.to_path_buf(),
            naming: NamingPolicy::Timestamp,
        });
        ReportComposer::new(
            ReportConfig::default(),
            writer,
            Arc::new(I18nManager::bundled(Locale::English).unwrap()),
            Arc::new(CountryDirectory::bundled().unwrap()),
        )
    }

    #[test]
    fn text_includes_table_only_with_summary() {
        let dir = create_temp_dir();
        let composer = composer(dir.path());
        let at = mock_local_time(2022, 1, 2, 9, 30, 15);
        let scope = Scope::Country("JPN".into());

        let without = composer.report_text(&at, &scope, None);
        assert_eq!(without.title, "COVID-19 Report");
        assert_eq!(without.generated, "Generated: 2022-01-02 09:30:15");
        assert!(without.table.is_none());

        let summary = SummaryFields {
            population: 126_050_796,
            ..SummaryFields::default()
        };
        let with = composer.report_text(&at, &scope, Some(&summary));
        let rows = with.table.unwrap();
        assert_eq!(rows[0], ["Country".to_string(), "Population".to_string()]);
        assert_eq!(rows[1], ["Japan".to_string(), "126,050,796".to_string()]);
    }

    #[test]
    fn document_is_a_pdf() {
        let text = ReportText {
            title: "COVID-19 Report".into(),
            generated: "Generated: 2022-01-02 09:30:15".into(),
            table: Some([
                ["Country".into(), "Population".into()],
                ["Japan".into(), "126,050,796".into()],
            ]),
            subtitle: "Case history chart:".into(),
        };
        let bytes = build_document(&ReportConfig::default(), &text, &tiny_png(), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn garbage_image_is_a_compose_error() {
        let text = ReportText {
            title: "t".into(),
            generated: "g".into(),
            table: None,
            subtitle: "s".into(),
        };
        let err = build_document(&ReportConfig::default(), &text, b"not a png", None).unwrap_err();
        assert_eq!(err.kind(), c19_common::ErrorKind::Compose);
    }

    #[tokio::test]
    async fn compose_writes_named_report() {
        let dir = create_temp_dir();
        let image_path = dir.path().join("chart.png");
        std::fs::write(&image_path, tiny_png()).unwrap();

        let artifact = composer(dir.path())
            .compose(
                &mock_local_time(2022, 1, 2, 9, 30, 15),
                &Scope::Country("Japan".into()),
                &image_path,
                None,
            )
            .await
            .unwrap();

        assert_eq!(artifact.kind, ArtifactKind::Pdf);
        let name = artifact.file_name().unwrap();
        assert!(name.starts_with("Report-Japan-"));
        assert!(name.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn missing_image_is_a_compose_error() {
        let dir = create_temp_dir();
        let err = composer(dir.path())
            .compose(
                &mock_local_time(2022, 1, 2, 9, 30, 15),
                &Scope::World,
                &dir.path().join("absent.png"),
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), c19_common::ErrorKind::Compose);
    }
}
