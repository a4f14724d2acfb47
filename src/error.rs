//! Error types for the ledger.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while building, persisting, or loading a ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A persisted line does not decode into a valid transaction
    #[error("Malformed record at line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// The backing file could not be read, created, or appended to
    #[error("Could not access ledger file {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field value would corrupt the persisted line
    #[error("Invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl LedgerError {
    pub(crate) fn malformed(line: u64, message: impl Into<String>) -> Self {
        LedgerError::Malformed {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LedgerError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for errors caused by the content of the ledger file
    /// rather than by the file system.
    pub fn is_malformed(&self) -> bool {
        matches!(self, LedgerError::Malformed { .. })
    }
}
