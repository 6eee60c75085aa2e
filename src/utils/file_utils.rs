use chrono::{DateTime, Local};
use log::{debug, warn};
use std::fs;
use std::path::Path;

pub const REPORT_EXTENSION: &str = "pptx";

/// `sales_report_<YYYYMMDD_HHMMSS>.pptx`
pub fn report_file_name(now: DateTime<Local>) -> String {
    format!(
        "sales_report_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        REPORT_EXTENSION
    )
}

/// Best-effort delete; a failure is logged and otherwise ignored.
pub fn remove_if_exists(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed temporary file: {}", path.display());
            true
        }
        Err(e) => {
            warn!("Could not remove {}: {}", path.display(), e);
            false
        }
    }
}
