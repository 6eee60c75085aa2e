use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::FilterError;

pub const BRACKET_WIDTH: u32 = 5;
pub const ALL_BRACKETS: &str = "all";

/// Inclusive age range parsed from a `"<lo>-<hi>"` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgeBracket {
    pub lo: u32,
    pub hi: u32,
}

impl AgeBracket {
    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// The 5-year bracket starting at `lo`.
    pub fn starting_at(lo: u32) -> Self {
        Self::new(lo, lo + BRACKET_WIDTH - 1)
    }

    pub fn contains(&self, age: u32) -> bool {
        age >= self.lo && age <= self.hi
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

impl FromStr for AgeBracket {
    type Err = FilterError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterError::InvalidBracket(label.to_string());
        let (lo, hi) = label.trim().split_once('-').ok_or_else(invalid)?;
        let lo = lo.trim().parse::<u32>().map_err(|_| invalid())?;
        let hi = hi.trim().parse::<u32>().map_err(|_| invalid())?;
        Ok(Self::new(lo, hi))
    }
}

/// What the dropdown asked for: everything, or a union of brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BracketSelection {
    All,
    Brackets(Vec<AgeBracket>),
}

impl BracketSelection {
    pub fn parse<S: AsRef<str>>(labels: &[S]) -> Result<Self, FilterError> {
        let labels: Vec<&str> = labels
            .iter()
            .map(|label| label.as_ref().trim())
            .filter(|label| !label.is_empty())
            .collect();

        if labels.is_empty() || labels.iter().any(|label| *label == ALL_BRACKETS) {
            return Ok(Self::All);
        }

        let brackets = labels
            .into_iter()
            .map(AgeBracket::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Brackets(brackets))
    }

    /// Parses the comma separated `brackets` query value.
    pub fn from_query(raw: Option<&str>) -> Result<Self, FilterError> {
        match raw {
            Some(raw) => Self::parse(&raw.split(',').collect::<Vec<_>>()),
            None => Ok(Self::All),
        }
    }

    pub fn matches(&self, age: u32) -> bool {
        match self {
            Self::All => true,
            Self::Brackets(brackets) => brackets.iter().any(|bracket| bracket.contains(age)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::All => ALL_BRACKETS.to_string(),
            Self::Brackets(brackets) => brackets
                .iter()
                .map(AgeBracket::label)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

// Dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketOption {
    pub label: String,
    pub value: String,
}

impl BracketOption {
    pub fn all() -> Self {
        Self {
            label: "All Age Groups".to_string(),
            value: ALL_BRACKETS.to_string(),
        }
    }
}

impl From<AgeBracket> for BracketOption {
    fn from(bracket: AgeBracket) -> Self {
        Self {
            label: bracket.label(),
            value: bracket.label(),
        }
    }
}
