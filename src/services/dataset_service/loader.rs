use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::DatasetError;
use crate::models::{BracketOption, Dataset, Record};
use crate::services::analytics_service::age_brackets;

pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let dataset = read_dataset(File::open(path)?)?;
    info!(
        "Loaded {} records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records = csv_reader
        .deserialize::<Record>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Dataset::new(records))
}

/// "All Age Groups" followed by one option per bracket of the full dataset.
pub fn bracket_options(dataset: &Dataset) -> Vec<BracketOption> {
    let records: Vec<&Record> = dataset.records().iter().collect();
    std::iter::once(BracketOption::all())
        .chain(age_brackets(&records).into_iter().map(BracketOption::from))
        .collect()
}
