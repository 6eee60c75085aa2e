pub mod analytics_service;
pub mod chart_service;
pub mod dataset_service;
pub mod report_service;

pub use analytics_service::{bracket_stats, calculate_kpis, filter_records};
pub use chart_service::{render_chart, CommandConverter, VectorConverter};
pub use dataset_service::{bracket_options, load_dataset};
pub use report_service::{generate_report, ReportArtifact, ReportRequest};
