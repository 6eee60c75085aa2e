use chrono::Local;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ReportError;
use crate::models::{ChartKind, KpiSnapshot, Record, RenderedChart};
use crate::services::analytics_service::{bracket_stats, calculate_kpis};
use crate::services::chart_service::{render_chart, VectorConverter};
use crate::services::report_service::package::Deck;
use crate::services::report_service::slide::{Geometry, ShapeDescriptor};
use crate::utils::{format_rate, remove_if_exists, report_file_name};

pub const REPORT_TITLE: &str = "Sales Dashboard Report";

const TITLE_SLIDE: usize = 0;
const KPI_SLIDE: usize = 1;
const SUBTITLE_IDX: u32 = 1;

/// Where each chart lands on the KPI slide, and the marker it replaces.
const CHART_SLOTS: [(ChartKind, &str, (f64, f64, f64, f64)); 2] = [
    (ChartKind::PagesVisited, "D", (0.5, 3.0, 6.0, 4.0)),
    (ChartKind::ConversionRate, "E", (7.0, 3.0, 6.0, 4.0)),
];

/// A finished report on disk. `file_name` is the download name; `path` is
/// unique per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: String,
    pub path: PathBuf,
}

pub struct ReportRequest<'a> {
    pub template: &'a Path,
    pub output_dir: &'a Path,
    pub records: &'a [&'a Record],
    pub converter: &'a dyn VectorConverter,
}

pub fn kpi_lines(kpis: &KpiSnapshot) -> [(&'static str, String); 3] {
    [
        ("A", format!("Total new users: {}", kpis.new_users)),
        ("B", format!("Total converted: {}", kpis.converted)),
        ("C", format!("Conversion rate: {}%", format_rate(kpis.conversion_rate))),
    ]
}

/// Builds a report deck from the template for the given (already filtered)
/// records and writes it to `output_dir`.
pub fn generate_report(request: &ReportRequest<'_>) -> Result<ReportArtifact, ReportError> {
    let mut deck = Deck::open(request.template)?;
    if deck.slide_count() < 2 {
        return Err(ReportError::TooFewSlides(deck.slide_count()));
    }
    info!(
        "Loaded template {} with {} slides",
        request.template.display(),
        deck.slide_count()
    );

    if let Err(e) = fill_title_slide(&mut deck) {
        warn!("Error updating title slide: {}", e);
    }

    let kpis = calculate_kpis(request.records);
    fill_kpi_markers(&mut deck, &kpis)?;

    // charts live in a private scratch dir so concurrent reports never collide
    let scratch = tempfile::Builder::new()
        .prefix("charts-")
        .tempdir_in(request.output_dir)?;
    let stats = bracket_stats(request.records);
    let mut charts = Vec::with_capacity(CHART_SLOTS.len());
    for (kind, _, _) in CHART_SLOTS {
        let chart = render_chart(kind, &stats, scratch.path(), request.converter)
            .map_err(|source| ReportError::Chart { kind, source })?;
        charts.push(chart);
    }

    let placed = place_charts(&mut deck, &charts);
    for chart in &charts {
        remove_if_exists(chart.path());
    }
    placed?;

    // unique on disk; the timestamped name is only what the caller offers for download
    let file_name = report_file_name(Local::now());
    let output = tempfile::Builder::new()
        .prefix("sales_report_")
        .suffix(".pptx")
        .tempfile_in(request.output_dir)?
        .into_temp_path();
    deck.save(&output)?;
    let path = output.keep().map_err(|e| e.error)?;
    info!("Report saved: {} ({})", path.display(), file_name);

    Ok(ReportArtifact { file_name, path })
}

fn fill_title_slide(deck: &mut Deck) -> Result<(), ReportError> {
    let shapes = deck.shapes(TITLE_SLIDE)?;
    let placeholders: Vec<&ShapeDescriptor> =
        shapes.iter().filter(|shape| shape.is_placeholder()).collect();

    match placeholders
        .iter()
        .find(|shape| shape.placeholder.as_ref().is_some_and(|ph| ph.is_title()))
    {
        Some(title) => deck.set_shape_text(TITLE_SLIDE, title.index, REPORT_TITLE)?,
        None => warn!("Title slide has no title placeholder"),
    }

    if placeholders.len() > 1 {
        let subtitle = placeholders
            .iter()
            .find(|shape| shape.placeholder.as_ref().is_some_and(|ph| ph.idx == SUBTITLE_IDX));
        match subtitle {
            Some(subtitle) => {
                let generated = format!("Generated on {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
                deck.set_shape_text(TITLE_SLIDE, subtitle.index, &generated)?;
            }
            None => warn!("Title slide has no subtitle placeholder"),
        }
    }
    Ok(())
}

fn fill_kpi_markers(deck: &mut Deck, kpis: &KpiSnapshot) -> Result<(), ReportError> {
    let shapes = deck.shapes(KPI_SLIDE)?;
    for (marker, text) in kpi_lines(kpis) {
        let targets: Vec<usize> = shapes
            .iter()
            .filter(|shape| shape.trimmed_text() == Some(marker))
            .map(|shape| shape.index)
            .collect();
        if targets.is_empty() {
            warn!("Marker '{}' not found on slide {}", marker, KPI_SLIDE + 1);
        }
        for index in targets {
            deck.set_shape_text(KPI_SLIDE, index, &text)?;
        }
    }
    Ok(())
}

fn place_charts(deck: &mut Deck, charts: &[RenderedChart]) -> Result<(), ReportError> {
    for ((_, marker, (x, y, width, height)), chart) in CHART_SLOTS.iter().zip(charts) {
        let image = fs::read(chart.path())?;
        deck.add_picture(
            KPI_SLIDE,
            image,
            chart.format,
            Geometry::from_inches(*x, *y, *width, *height),
        )?;

        let marker_shape = deck
            .shapes(KPI_SLIDE)?
            .into_iter()
            .find(|shape| shape.trimmed_text() == Some(*marker));
        match marker_shape {
            Some(shape) => deck.set_shape_text(KPI_SLIDE, shape.index, "")?,
            None => warn!("Marker '{}' for the {} chart not found", marker, chart.kind),
        }
    }
    Ok(())
}
