pub mod file_utils;
pub mod format_utils;
pub mod log_utils;

pub use file_utils::{remove_if_exists, report_file_name, REPORT_EXTENSION};
pub use format_utils::{escape_xml, format_rate, format_thousands};
pub use log_utils::init_logging;
