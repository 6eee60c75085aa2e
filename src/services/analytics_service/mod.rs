// src/services/analytics_service/mod.rs

pub mod compute;
pub mod filter;

pub use compute::{age_brackets, bracket_stats, calculate_kpis, round2};
pub use filter::filter_records;

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::Record;

    /// Ten rows: 6 new users, 4 conversions, 40 pages visited in total.
    pub fn sample_records() -> Vec<Record> {
        vec![
            Record::new(22, true, true, 4),
            Record::new(24, true, false, 3),
            Record::new(26, false, true, 5),
            Record::new(31, true, false, 2),
            Record::new(35, false, false, 6),
            Record::new(41, true, true, 4),
            Record::new(45, false, false, 3),
            Record::new(50, true, false, 5),
            Record::new(52, true, true, 4),
            Record::new(58, false, false, 4),
        ]
    }
}
