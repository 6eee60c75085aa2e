use serde::{Deserialize, Deserializer, Serialize};

// One row of the sales dataset; extra csv columns are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Record {
    pub age: u32,
    #[serde(deserialize_with = "deserialize_flag")]
    pub new_user: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub converted: bool,
    pub total_pages_visited: u64,
}

impl Record {
    pub fn new(age: u32, new_user: bool, converted: bool, total_pages_visited: u64) -> Self {
        Self {
            age,
            new_user,
            converted,
            total_pages_visited,
        }
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected 0/1 flag, got '{}'",
            other
        ))),
    }
}

/// The loaded dataset. Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
