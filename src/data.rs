use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::accounting::entries::JournalEntry;
use crate::accounting::orders::{check_columns, OrderRow};
use crate::accounting::{self, Journal, JournalError};
use crate::config::{ConfigError, JournalConfig};

pub const OUTPUT_COLUMNS: [&str; 9] = [
    "N° Compte",
    "Journal",
    "Date écriture",
    "Commentaire",
    "Montant débit",
    "Montant crédit",
    "N° Pièce",
    "Date échéance",
    "Lettrage",
];

#[derive(Debug, Error)]
pub enum DataError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Journal(#[from] JournalError),
}

/// One exported journal line, in `OUTPUT_COLUMNS` order.
#[derive(Debug, Serialize)]
pub struct JournalRecord<'a> {
    pub account_code: &'a str,
    pub journal: &'a str,
    pub entry_date: String,
    pub comment: &'a str,
    pub debit: String,
    pub credit: String,
    pub piece: &'a str,
    pub due_date: &'a str,
    pub reconciliation_mark: &'a str,
}

impl<'a> From<&'a JournalEntry> for JournalRecord<'a> {
    fn from(entry: &'a JournalEntry) -> Self {
        let cents = |amount: Option<rust_decimal::Decimal>| amount.map(|a| format!("{:.2}", a)).unwrap_or_default();

        JournalRecord {
            account_code: &entry.account().code,
            journal: entry.journal_code(),
            entry_date: entry.entry_date(),
            comment: entry.comment(),
            debit: cents(entry.debit()),
            credit: cents(entry.credit()),
            piece: entry.piece_reference(),
            due_date: "",
            reconciliation_mark: "",
        }
    }
}

/// Reads an order export. Each row remembers its physical line so that a
/// parse error can point back into the file.
pub fn read_orders<R: Read>(reader: R, config: &JournalConfig) -> Result<Vec<OrderRow>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(config.input_delimiter_byte()?)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    debug!("order export columns: {:?}", headers);
    check_columns(|column| headers.iter().any(|header| header == column))?;

    let mut rows = Vec::new();
    let mut record = csv::StringRecord::new();
    while csv_reader.read_record(&mut record)? {
        let mut row: OrderRow = record.deserialize(Some(&headers))?;
        row.line = record.position().map_or(0, |position| position.line());
        rows.push(row);
    }
    debug!("read {} rows", rows.len());

    Ok(rows)
}

/// Writes the header even when there is nothing to export. Lines end with
/// CRLF.
pub fn write_journal<W: Write>(writer: W, entries: &[JournalEntry], config: &JournalConfig) -> Result<(), DataError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(config.output_delimiter_byte()?)
        .terminator(csv::Terminator::CRLF)
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(OUTPUT_COLUMNS)?;
    for entry in entries {
        let record: JournalRecord = entry.into();
        csv_writer.serialize(record)?;
    }

    csv_writer.flush()?;

    Ok(())
}

pub fn process_csv<R: Read, W: Write>(reader: R, writer: W, config: &JournalConfig) -> Result<Journal, DataError> {
    let rows = read_orders(reader, config)?;
    let journal = accounting::transform(&rows, config)?;
    write_journal(writer, &journal.entries, config)?;

    Ok(journal)
}

pub fn process_file(input: &Path, output: &Path, config: &JournalConfig) -> Result<Journal, DataError> {
    let reader = File::open(input)?;
    let writer = File::create(output)?;
    debug!("converting {} into {}", input.display(), output.display());

    process_csv(reader, writer, config)
}
