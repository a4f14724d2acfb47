//! Per-user ledger store backed by an append-only file.
//!
//! The store loads the whole file once when opened and afterwards only ever
//! appends, both in memory and on disk. File handles are opened per call and
//! closed before returning.

use crate::amount::Amount;
use crate::codec::{self, reader_builder};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::transaction::{Transaction, TxKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

/// What happened to a record handed to [`LedgerStore::append`].
///
/// The record is kept in memory in both cases.
#[must_use]
#[derive(Debug)]
pub enum AppendOutcome {
    /// Written to the backing file.
    Persisted,

    /// Kept in memory only; the durable write failed.
    MemoryOnly(LedgerError),
}

impl AppendOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, AppendOutcome::Persisted)
    }

    /// Collapses the outcome for callers that only care about failure.
    pub fn into_result(self) -> Result<()> {
        match self {
            AppendOutcome::Persisted => Ok(()),
            AppendOutcome::MemoryOnly(e) => Err(e),
        }
    }
}

/// The ordered transactions of one user.
///
/// # Invariants
///
/// - Records are kept in exactly the order they were loaded and appended
/// - Records are never edited; the only removal is
///   [`rollback_last_unpersisted`](LedgerStore::rollback_last_unpersisted)
#[derive(Debug)]
pub struct LedgerStore {
    user_key: String,
    path: PathBuf,
    transactions: Vec<Transaction>,

    /// Indexes of records whose durable write failed.
    unpersisted: Vec<usize>,
}

impl LedgerStore {
    /// Loads the ledger for `user_key`, creating an empty backing file for a
    /// first-time user.
    ///
    /// Any line that fails to decode aborts the whole load.
    pub fn open(config: &LedgerConfig, user_key: &str) -> Result<Self> {
        let path = config.ledger_path(user_key);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LedgerError::persistence(parent, e))?;
        }

        let transactions = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                info!(
                    "No transactions on record for {}, created {}",
                    user_key,
                    path.display()
                );
                Vec::new()
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                info!("Loading transactions from {}", path.display());
                read_ledger(&path)?
            }
            Err(e) => return Err(LedgerError::persistence(&path, e)),
        };

        debug!("Loaded {} transactions for {}", transactions.len(), user_key);

        Ok(LedgerStore {
            user_key: user_key.to_string(),
            path,
            transactions,
            unpersisted: Vec::new(),
        })
    }

    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Appends `tx` in memory, then to the backing file.
    pub fn append(&mut self, tx: Transaction) -> AppendOutcome {
        let line = codec::encode(&tx);
        self.transactions.push(tx);

        match append_line(&self.path, &line) {
            Ok(()) => {
                debug!("Appended to {}: {}", self.path.display(), line);
                AppendOutcome::Persisted
            }
            Err(e) => {
                self.unpersisted.push(self.transactions.len() - 1);
                warn!(
                    "{}; {} record(s) are in memory but not in {}",
                    e,
                    self.unpersisted.len(),
                    self.path.display()
                );
                AppendOutcome::MemoryOnly(e)
            }
        }
    }

    /// Builds a transaction from its parts and appends it.
    ///
    /// `amount` must already carry the deposit (+) or payment (-) sign.
    pub fn record(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        description: &str,
        vendor: &str,
        amount: Amount,
    ) -> Result<AppendOutcome> {
        let tx = Transaction::new(date, time, description, vendor, amount)?;
        Ok(self.append(tx))
    }

    /// Records a deposit or payment stamped with `now`, signing `magnitude`
    /// according to `kind`.
    pub fn record_now(
        &mut self,
        kind: TxKind,
        description: &str,
        vendor: &str,
        magnitude: Amount,
        now: NaiveDateTime,
    ) -> Result<AppendOutcome> {
        self.record(
            now.date(),
            now.time(),
            description,
            vendor,
            kind.signed(magnitude),
        )
    }

    /// Returns `true` when every in-memory record is also in the backing file.
    pub fn is_in_sync(&self) -> bool {
        self.unpersisted.is_empty()
    }

    /// Removes the most recent record if its durable write failed.
    pub fn rollback_last_unpersisted(&mut self) -> Option<Transaction> {
        let last = self.transactions.len().checked_sub(1)?;
        if self.unpersisted.last() != Some(&last) {
            return None;
        }
        self.unpersisted.pop();
        let tx = self.transactions.pop();
        debug!("Rolled back unpersisted record for {}", self.user_key);
        tx
    }
}

fn read_ledger(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path).map_err(|e| LedgerError::persistence(path, e))?;
    let mut reader = reader_builder().from_reader(BufReader::new(file));

    let mut transactions = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| read_error(path, e))?;
        transactions.push(codec::decode_record(&record)?);
    }

    Ok(transactions)
}

/// Splits reader failures into file-system problems and bad content.
fn read_error(path: &Path, err: csv::Error) -> LedgerError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => LedgerError::persistence(path, source),
        _ => LedgerError::malformed(line, message),
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LedgerError::persistence(path, e))?;

    writeln!(file, "{}", line).map_err(|e| LedgerError::persistence(path, e))?;
    file.flush().map_err(|e| LedgerError::persistence(path, e))
}
