use serde::Serialize;

use crate::models::sales::bracket::AgeBracket;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct KpiSnapshot {
    pub new_users: u64,
    pub converted: u64,
    pub conversion_rate: f64,
}

impl KpiSnapshot {
    pub fn new(new_users: u64, converted: u64, conversion_rate: f64) -> Self {
        Self {
            new_users,
            converted,
            conversion_rate,
        }
    }
}

// Aggregates for one 5-year bracket of the active record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracketStat {
    pub bracket: AgeBracket,
    pub label: String,
    pub records: usize,
    pub pages_visited: u64,
    /// Mean of the converted flag as a percentage; `None` for an empty bracket.
    pub conversion_rate: Option<f64>,
}
