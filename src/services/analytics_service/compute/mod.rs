pub mod brackets;
pub mod kpis;

pub use brackets::{age_brackets, bracket_stats};
pub use kpis::{calculate_kpis, round2};
