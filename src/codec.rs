//! Line codec for the backing file.
//!
//! Each transaction is one line of the form
//! `date|time|description|vendor|amount`. There is no escaping: free-text
//! fields are kept delimiter-free by [`Transaction::new`].

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::transaction::Transaction;
use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

/// Field separator.
pub const DELIMITER: u8 = b'|';

/// Number of fields on every line.
pub const FIELD_COUNT: usize = 5;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Older ledgers omit the seconds when they are zero.
const SHORT_TIME_FORMAT: &str = "%H:%M";

/// A line split into its fields, before date and time parsing.
#[derive(Debug, Deserialize)]
struct RawEntry<'a> {
    date: &'a str,
    time: &'a str,
    description: &'a str,
    vendor: &'a str,
    amount: Amount,
}

/// Builds a reader for the line format: no header, no quoting, no trimming.
///
/// Flexible so that a wrong field count surfaces as a malformed record
/// with a useful message rather than a generic csv error.
pub(crate) fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(DELIMITER)
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(Trim::None);
    builder
}

/// Encodes a transaction as a single line, without the trailing newline.
pub fn encode(tx: &Transaction) -> String {
    let sep = DELIMITER as char;
    format!(
        "{}{sep}{}{sep}{}{sep}{}{sep}{}",
        tx.date().format(DATE_FORMAT),
        tx.time().format(TIME_FORMAT),
        tx.description(),
        tx.vendor(),
        tx.amount(),
    )
}

/// Decodes one line into a transaction.
pub fn decode(line: &str) -> Result<Transaction> {
    let mut reader = reader_builder().from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| LedgerError::malformed(1, e.to_string()))?;
    if !found {
        return Err(LedgerError::malformed(1, "empty line"));
    }
    decode_record(&record)
}

/// Decodes a record already split by a reader built with [`reader_builder`].
pub(crate) fn decode_record(record: &StringRecord) -> Result<Transaction> {
    let line = record.position().map(|p| p.line()).unwrap_or(1);

    if record.len() != FIELD_COUNT {
        return Err(LedgerError::malformed(
            line,
            format!("expected {} fields, found {}", FIELD_COUNT, record.len()),
        ));
    }

    let raw: RawEntry = record
        .deserialize(None)
        .map_err(|e| LedgerError::malformed(line, format!("invalid amount: {}", e)))?;

    let date = NaiveDate::parse_from_str(raw.date, DATE_FORMAT).map_err(|e| {
        LedgerError::malformed(line, format!("invalid date {:?}: {}", raw.date, e))
    })?;
    let time = parse_time(raw.time).map_err(|e| {
        LedgerError::malformed(line, format!("invalid time {:?}: {}", raw.time, e))
    })?;

    Transaction::new(date, time, raw.description, raw.vendor, raw.amount)
        .map_err(|e| LedgerError::malformed(line, e.to_string()))
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, SHORT_TIME_FORMAT))
}
