use log::{debug, info, warn};
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use crate::errors::ChartError;
use crate::models::{BracketStat, ChartKind, ImageFormat, RenderedChart};
use crate::services::chart_service::converter::VectorConverter;
use crate::services::chart_service::svg::BarChart;
use crate::utils::remove_if_exists;

/// Raster fallback scale over the 1000x600 svg canvas.
pub const PNG_SCALE: f32 = 2.0;

/// Writes the chart as svg, then tries EMF through `converter`, falling back
/// to PNG. Exactly one raster file is left in `dir`; the svg is always removed.
pub fn render_chart(
    kind: ChartKind,
    stats: &[BracketStat],
    dir: &Path,
    converter: &dyn VectorConverter,
) -> Result<RenderedChart, ChartError> {
    let svg = BarChart::from_stats(kind, stats).to_svg();
    let stem = kind.file_stem();
    let svg_path = dir.join(format!("temp_{}.svg", stem));
    let emf_path = dir.join(format!("{}.emf", stem));
    let png_path = dir.join(format!("{}.png", stem));

    fs::write(&svg_path, &svg)?;

    if converter.is_available() {
        match converter.convert(&svg_path, &emf_path) {
            Ok(()) if emf_path.exists() => {
                remove_if_exists(&svg_path);
                remove_if_exists(&png_path);
                info!("Chart saved as EMF: {}", emf_path.display());
                return Ok(RenderedChart {
                    kind,
                    format: ImageFormat::Emf,
                    path: emf_path,
                });
            }
            Ok(()) => warn!("Converter reported success but wrote no {}", emf_path.display()),
            Err(e) => warn!("Error converting {} to EMF: {}", svg_path.display(), e),
        }
    }

    info!("EMF converter not available or conversion failed, using PNG fallback for {} chart", kind);
    remove_if_exists(&emf_path);
    let rasterized = rasterize_svg(&svg, &png_path, PNG_SCALE);
    remove_if_exists(&svg_path);
    rasterized?;

    if png_path.exists() {
        info!("Chart saved as PNG: {}", png_path.display());
        Ok(RenderedChart {
            kind,
            format: ImageFormat::Png,
            path: png_path,
        })
    } else {
        Err(ChartError::NotProduced(kind))
    }
}

/// System fonts, scanned once per process.
fn system_fonts() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut fonts = usvg::fontdb::Database::new();
            fonts.load_system_fonts();
            debug!("Loaded {} system font faces", fonts.len());
            Arc::new(fonts)
        })
        .clone()
}

pub fn rasterize_svg(svg: &str, png_path: &Path, scale: f32) -> Result<(), ChartError> {
    let options = usvg::Options {
        fontdb: system_fonts(),
        ..usvg::Options::default()
    };

    let tree = usvg::Tree::from_str(svg, &options)?;
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        ChartError::Raster(format!("cannot allocate a {}x{} pixmap", width, height))
    })?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    pixmap
        .save_png(png_path)
        .map_err(|e| ChartError::Raster(e.to_string()))
}
