use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    PagesVisited,
    ConversionRate,
}

impl ChartKind {
    pub const ALL: [ChartKind; 2] = [ChartKind::PagesVisited, ChartKind::ConversionRate];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::PagesVisited => "Total pages visited vs Age group",
            ChartKind::ConversionRate => "Average conversion rate vs Age group",
        }
    }

    pub fn y_label(&self) -> &'static str {
        match self {
            ChartKind::PagesVisited => "Total Pages Visited",
            ChartKind::ConversionRate => "Conversion Rate (%)",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ChartKind::PagesVisited => "#0051a6",
            ChartKind::ConversionRate => "#28a745",
        }
    }

    /// Base name shared by the svg, emf and png files of this chart.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::PagesVisited => "pages_visited_chart",
            ChartKind::ConversionRate => "conversion_chart",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind_str = match self {
            ChartKind::PagesVisited => "pages_visited",
            ChartKind::ConversionRate => "conversion_rate",
        };
        write!(f, "{}", kind_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Emf,
    Png,
    Wmf,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Emf => "emf",
            ImageFormat::Png => "png",
            ImageFormat::Wmf => "wmf",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Emf => "image/x-emf",
            ImageFormat::Png => "image/png",
            ImageFormat::Wmf => "image/x-wmf",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "emf" => Some(ImageFormat::Emf),
            "png" => Some(ImageFormat::Png),
            "wmf" => Some(ImageFormat::Wmf),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }
}

/// A chart image that made it to disk in its final raster format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub kind: ChartKind,
    pub format: ImageFormat,
    pub path: PathBuf,
}

impl RenderedChart {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
