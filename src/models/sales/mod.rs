pub mod bracket;
pub mod kpi;
pub mod record;

pub use bracket::{AgeBracket, BracketOption, BracketSelection, ALL_BRACKETS, BRACKET_WIDTH};
pub use kpi::{BracketStat, KpiSnapshot};
pub use record::{Dataset, Record};
