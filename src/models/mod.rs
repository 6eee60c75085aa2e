// src/models/mod.rs

pub mod api;
pub mod app;
pub mod chart;
pub mod sales;

pub use api::{DashboardResponse, FilterParams, FormattedKpis, ReportResponse, ReportStatus};
pub use app::{AppConfig, AppState};
pub use chart::{ChartKind, ImageFormat, RenderedChart};
pub use sales::{
    AgeBracket, BracketOption, BracketSelection, BracketStat, Dataset, KpiSnapshot, Record,
    ALL_BRACKETS, BRACKET_WIDTH,
};
