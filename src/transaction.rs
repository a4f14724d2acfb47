//! The transaction record and its sign convention.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use chrono::{NaiveDate, NaiveTime, Timelike};

/// Characters that may not appear in free-text fields because they would
/// split or terminate a persisted line.
const FORBIDDEN_CHARS: [char; 3] = ['|', '\n', '\r'];

/// Which way money moved, as chosen by the user when recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    /// Money in; stored as a non-negative amount.
    Deposit,

    /// Money out; stored as a negative amount.
    Payment,
}

impl TxKind {
    /// Applies this kind's sign to `magnitude`, ignoring whatever sign it
    /// was entered with.
    pub fn signed(self, magnitude: Amount) -> Amount {
        match self {
            TxKind::Deposit => magnitude.abs(),
            TxKind::Payment => -magnitude.abs(),
        }
    }
}

/// One monetary event in a user's ledger.
///
/// Fields are fixed at construction. Whether a record is a deposit or a
/// payment is derived from the sign of its amount, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    date: NaiveDate,
    time: NaiveTime,
    description: String,
    vendor: String,
    amount: Amount,
}

impl Transaction {
    /// Builds a transaction, rejecting free text that the line format
    /// cannot carry and amounts beyond [`Amount::max_recordable`].
    ///
    /// Sub-second precision is dropped from `time`; the persisted format
    /// only keeps whole seconds.
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Amount,
    ) -> Result<Self> {
        let description = description.into();
        let vendor = vendor.into();
        check_free_text("description", &description)?;
        check_free_text("vendor", &vendor)?;
        if !amount.is_recordable() {
            return Err(LedgerError::InvalidField {
                field: "amount",
                message: format!(
                    "{} is larger than {} in magnitude",
                    amount,
                    Amount::max_recordable()
                ),
            });
        }

        Ok(Transaction {
            date,
            time: time.with_nanosecond(0).unwrap_or(time),
            description,
            vendor,
            amount,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Zero counts as a deposit.
    pub fn is_deposit(&self) -> bool {
        self.amount.is_non_negative()
    }

    pub fn is_payment(&self) -> bool {
        !self.is_deposit()
    }

    pub fn kind(&self) -> TxKind {
        if self.is_deposit() {
            TxKind::Deposit
        } else {
            TxKind::Payment
        }
    }
}

fn check_free_text(field: &'static str, value: &str) -> Result<()> {
    match value.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        Some(c) => Err(LedgerError::InvalidField {
            field,
            message: format!("{:?} is not allowed", c),
        }),
        None => Ok(()),
    }
}
