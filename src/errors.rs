// src/errors.rs

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ChartKind;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset file not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset row: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("age bracket '{0}' is not of the form <int>-<int>")]
    InvalidBracket(String),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("chart file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse generated svg: {0}")]
    Svg(#[from] usvg::Error),
    #[error("could not rasterize chart: {0}")]
    Raster(String),
    #[error("no image was produced for the {0} chart")]
    NotProduced(ChartKind),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("template file not found at {0}")]
    TemplateNotFound(PathBuf),
    #[error("template must have at least 2 slides, found {0}")]
    TooFewSlides(usize),
    #[error("slide index {index} out of range (presentation has {count} slides)")]
    SlideOutOfRange { index: usize, count: usize },
    #[error("missing package part {0}")]
    MissingPart(String),
    #[error("unsupported slide markup: {0}")]
    UnsupportedMarkup(String),
    #[error("invalid xml in {part}: {source}")]
    Xml {
        part: String,
        #[source]
        source: roxmltree::Error,
    },
    #[error("package error: {0}")]
    Package(#[from] zip::result::ZipError),
    #[error("report file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to generate the {kind} chart: {source}")]
    Chart {
        kind: ChartKind,
        #[source]
        source: ChartError,
    },
    #[error("report task aborted: {0}")]
    Aborted(String),
}
