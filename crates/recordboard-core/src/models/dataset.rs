use chrono::{DateTime, Utc};
use tracing::debug;

use super::{Discipline, Record};
use crate::table;

/// Fully decoded contents of one discipline's sheet.
///
/// A dataset is never mutated after construction; a refresh builds a new one
/// and swaps it in whole.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub discipline: Discipline,
    pub records: Vec<Record>,
    /// When the underlying document was fetched, if known.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Dataset {
    pub fn decode(discipline: Discipline, text: &str, fetched_at: Option<DateTime<Utc>>) -> Self {
        let records: Vec<Record> = table::decode(text)
            .iter()
            .map(|row| Record::from_row(discipline, row))
            .collect();

        debug!(discipline = %discipline, count = records.len(), "Decoded records");

        Self {
            discipline,
            records,
            fetched_at,
        }
    }

    pub fn empty(discipline: Discipline) -> Self {
        Self {
            discipline,
            records: Vec::new(),
            fetched_at: None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
