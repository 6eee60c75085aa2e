use serde::{Deserialize, Serialize};

use crate::models::sales::{BracketStat, KpiSnapshot};

// `?brackets=20-24,25-29`; absent or `all` selects every record
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub brackets: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FormattedKpis {
    pub new_users: String,
    pub converted: String,
    pub conversion_rate: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub selection: String,
    pub records: usize,
    pub kpis: KpiSnapshot,
    pub formatted: FormattedKpis,
    pub brackets: Vec<BracketStat>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReportResponse {
    pub status: ReportStatus,
    pub message: String,
    pub timestamp: String,
}
