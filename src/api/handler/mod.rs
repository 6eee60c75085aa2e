pub mod dashboard;
pub mod page;
pub mod report;

pub use dashboard::{brackets_handler, chart_handler, dashboard_handler, select_records};
pub use page::{page_handler, render_page};
pub use report::{report_handler, PPTX_CONTENT_TYPE};
