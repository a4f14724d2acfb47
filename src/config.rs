//! Where ledgers live and how date windows are computed.

use std::path::{Path, PathBuf};

/// Default directory, relative to the working directory, holding one file per user.
pub const DEFAULT_DATA_DIR: &str = "AllTransactions";

/// Appended to the user key to form the backing file name.
pub const DEFAULT_FILE_SUFFIX: &str = "transactions.csv";

/// How "to date" and "previous" reports pick their start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// `today` minus one month (or twelve months), clamped to month end.
    #[default]
    Rolling,

    /// The first day of the current month (or year).
    Calendar,
}

/// Ledger settings for one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub data_dir: PathBuf,
    pub file_suffix: String,
    pub window: Window,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            file_suffix: DEFAULT_FILE_SUFFIX.to_string(),
            window: Window::Rolling,
        }
    }
}

impl LedgerConfig {
    /// Default settings rooted at `data_dir` (useful for testing).
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        LedgerConfig {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..LedgerConfig::default()
        }
    }

    pub fn window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    /// Resolves the backing file for `user_key`.
    ///
    /// The whole file name is lowercased, so `"Alice"` and `"ALICE"` share
    /// one ledger.
    pub fn ledger_path(&self, user_key: &str) -> PathBuf {
        let file_name = format!("{}{}", user_key, self.file_suffix).to_lowercase();
        self.data_dir.join(file_name)
    }
}
