//! # Pocket Ledger
//!
//! A personal finance ledger: deposits and payments are recorded per user
//! in a flat, append-only file and reviewed through filtered reports.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: amounts keep at least 2 decimal places via `rust_decimal`
//! - **Append-only persistence**: one `date|time|description|vendor|amount` line per record
//! - **Derived sign**: deposit or payment is decided by the sign of the amount
//! - **Stable order**: every report keeps the order records were appended in
//!
//! ## Example
//!
//! ```no_run
//! use pocket_ledger::{report, LedgerConfig, LedgerStore, TxKind};
//! use std::str::FromStr;
//!
//! let config = LedgerConfig::default();
//! let mut store = LedgerStore::open(&config, "alice").unwrap();
//! let now = chrono::Local::now().naive_local();
//! let amount = pocket_ledger::Amount::from_str("12.50").unwrap();
//! store
//!     .record_now(TxKind::Payment, "lunch", "Cafe", amount, now)
//!     .unwrap()
//!     .into_result()
//!     .unwrap();
//!
//! let recent = report::filter_month_to_date(store.transactions(), now.date());
//! println!("{}", report::running_total(recent));
//! ```

pub mod amount;
pub mod codec;
pub mod config;
pub mod error;
pub mod report;
pub mod store;
pub mod transaction;

pub use amount::Amount;
pub use config::{LedgerConfig, Window};
pub use error::{LedgerError, Result};
pub use report::{running_total, CustomQuery, Report};
pub use store::{AppendOutcome, LedgerStore};
pub use transaction::{Transaction, TxKind};
