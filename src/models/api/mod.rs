pub mod params;

pub use params::{DashboardResponse, FilterParams, FormattedKpis, ReportResponse, ReportStatus};
