// src/services/chart_service/mod.rs

pub mod converter;
pub mod render;
pub mod svg;

pub use converter::{CommandConverter, VectorConverter};
pub use render::{rasterize_svg, render_chart, PNG_SCALE};
pub use svg::{Bar, BarChart, NO_DATA_LABEL};
