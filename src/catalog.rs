//! The round catalog: the ordered, immutable sequence of quiz rounds loaded
//! once at startup from a CSV file.

use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::types::RoundNumber;

/// One option a round offers, with the source label that stays hidden until
/// the round is revealed.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOption {
    pub text: String,
    pub source: String,
}

/// A single quiz round as loaded from the catalog file.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub number: u32,
    pub question: String,
    pub option_a: RoundOption,
    pub option_b: RoundOption,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] io::Error),
    #[error("catalog contains no usable rounds")]
    Empty,
}

/// Raw CSV row. All fields optional so that incomplete rows deserialize and
/// can be skipped instead of aborting the whole load.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Number")]
    number: Option<String>,
    #[serde(rename = "Question")]
    question: Option<String>,
    #[serde(rename = "Option A Text")]
    option_a_text: Option<String>,
    #[serde(rename = "Option A Source")]
    option_a_source: Option<String>,
    #[serde(rename = "Option B Text")]
    option_b_text: Option<String>,
    #[serde(rename = "Option B Source")]
    option_b_source: Option<String>,
}

impl RawRow {
    /// A row only counts when every required column is present and non-empty
    /// and the ordinal parses.
    fn into_record(self) -> Option<RoundRecord> {
        fn required(field: Option<String>) -> Option<String> {
            field.filter(|s| !s.is_empty())
        }

        Some(RoundRecord {
            number: required(self.number)?.parse().ok()?,
            question: required(self.question)?,
            option_a: RoundOption {
                text: required(self.option_a_text)?,
                source: required(self.option_a_source)?,
            },
            option_b: RoundOption {
                text: required(self.option_b_text)?,
                source: required(self.option_b_source)?,
            },
        })
    }
}

/// The loaded catalog. Non-empty by construction and never mutated after
/// load, so lookups by in-range ordinal cannot fail.
#[derive(Debug, Clone)]
pub struct Catalog {
    rounds: Vec<RoundRecord>,
}

impl Catalog {
    /// Parse catalog CSV from any reader. Malformed rows (missing or empty
    /// required columns, unparseable ordinals, ragged records) are silently
    /// skipped; an input with no usable rows is an error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let mut rounds = Vec::new();
        for row in csv_reader.deserialize::<RawRow>() {
            let Ok(raw) = row else {
                continue;
            };
            if let Some(record) = raw.into_record() {
                rounds.push(record);
            }
        }

        if rounds.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { rounds })
    }

    /// Load the catalog from a file path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Look up a round by 1-based ordinal. The session state machine keeps
    /// its current round within `1..=len`, so its lookups always succeed.
    pub fn record(&self, number: RoundNumber) -> &RoundRecord {
        &self.rounds[number - 1]
    }
}
