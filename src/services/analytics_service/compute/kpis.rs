use crate::models::{KpiSnapshot, Record};

/// New users, conversions and the conversion rate of a record set.
///
/// The rate is `Σconverted / Σpages_visited`, in percent, rounded to two
/// decimals. It is *not* conversions per user. `0` when no pages were visited.
pub fn calculate_kpis(records: &[&Record]) -> KpiSnapshot {
    if records.is_empty() {
        return KpiSnapshot::default();
    }

    let new_users = records.iter().filter(|r| r.new_user).count() as u64;
    let converted = records.iter().filter(|r| r.converted).count() as u64;
    let total_pages_visited: u64 = records.iter().map(|r| r.total_pages_visited).sum();

    let conversion_rate = if total_pages_visited > 0 {
        round2(converted as f64 / total_pages_visited as f64 * 100.0)
    } else {
        0.0
    };

    KpiSnapshot::new(new_users, converted, conversion_rate)
}

/// Two decimals, ties to even (`3.125` -> `3.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
