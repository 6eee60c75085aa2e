use crate::models::{BracketSelection, Record};

/// Rows whose age falls in at least one selected bracket. `All` keeps every row.
pub fn filter_records<'a, I>(records: I, selection: &BracketSelection) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records
        .into_iter()
        .filter(|record| selection.matches(record.age))
        .collect()
}
