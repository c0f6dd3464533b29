use chrono::NaiveDate;
use thiserror::Error;

pub mod amount;
pub mod chart;
pub mod daily;
pub mod entries;
pub mod orders;


use crate::config::{ConfigError, JournalConfig};
use entries::JournalEntry;
use orders::OrderRow;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("required column `{column}` is missing")]
    MissingColumn { column: String },
    #[error("line {line}: invalid amount {value:?} in column `{field}`")]
    InvalidAmount { line: u64, field: String, value: String },
    #[error("line {line}: order amounts exceed the decimal range")]
    OrderOverflow { line: u64 },
    #[error("{date}: daily amounts exceed the decimal range")]
    AmountOverflow { date: NaiveDate },
    #[error("{0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Counts reported back to the caller after a run.
///
/// `undated_orders` are part of `orders` but never reach an aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub orders: usize,
    pub undated_orders: usize,
    pub days: usize,
    pub entries: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Journal {
    pub summary: Summary,
    pub entries: Vec<JournalEntry>,
}

/// Runs the whole pipeline: rows -> orders -> daily aggregates -> journal entries.
pub fn transform(rows: &[OrderRow], config: &JournalConfig) -> Result<Journal, JournalError> {
    config.validate()?;

    let book = orders::extract_orders(rows, config)?;
    let daily = daily::aggregate_by_date(&book)?;
    let entries = entries::generate_entries(&daily, config)?;

    let summary = Summary {
        orders: book.len(),
        undated_orders: book.undated_count(),
        days: daily.len(),
        entries: entries.len(),
    };

    Ok(Journal { summary, entries })
}
