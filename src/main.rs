//! Pocket Ledger CLI
//!
//! Records deposits and payments for a user and prints reports over their
//! ledger, one operation per run.
//!
//! # Usage
//!
//! ```bash
//! pocket-ledger --user alice deposit --vendor ACME --amount 2500 --description paycheck
//! pocket-ledger --user alice payment --vendor Amazon --amount 19.99
//! pocket-ledger --user alice report month-to-date
//! pocket-ledger --user alice report vendor amazon
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pocket_ledger::codec::{DATE_FORMAT, TIME_FORMAT};
use pocket_ledger::config::DEFAULT_DATA_DIR;
use pocket_ledger::{
    running_total, Amount, AppendOutcome, CustomQuery, LedgerConfig, LedgerStore, Report,
    Result, Transaction, TxKind, Window,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "pocket-ledger",
    version,
    about = "Personal finance ledger: record deposits and payments, review reports"
)]
struct Cli {
    /// Directory holding one ledger file per user
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Start "to date" reports on the 1st of the month or year instead of a rolling window
    #[arg(long)]
    calendar: bool,

    /// Whose ledger to open (case-insensitive)
    #[arg(short, long)]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record money coming in
    Deposit(EntryArgs),

    /// Record money going out
    Payment(EntryArgs),

    /// List the ledger
    Ledger {
        #[arg(value_enum, default_value_t = View::All)]
        view: View,
    },

    /// Date and vendor reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Search by any combination of criteria
    Search(SearchArgs),

    /// Print the running total of the whole ledger
    Balance,
}

#[derive(Args)]
struct EntryArgs {
    #[arg(long)]
    vendor: String,

    #[arg(long, default_value = "")]
    description: String,

    /// Amount; the sign is set by the deposit/payment command
    #[arg(long, allow_hyphen_values = true)]
    amount: Amount,

    /// Transaction date (YYYY-MM-DD); defaults to now
    #[arg(long, requires = "time")]
    date: Option<NaiveDate>,

    /// Transaction time (HH:MM:SS); defaults to now
    #[arg(long, requires = "date")]
    time: Option<NaiveTime>,
}

#[derive(Clone, Copy, ValueEnum)]
enum View {
    All,
    Deposits,
    Payments,
}

#[derive(Subcommand)]
enum ReportCommand {
    MonthToDate,
    PreviousMonth,
    YearToDate,
    PreviousYear,
    /// Transactions with one vendor, ignoring case
    Vendor { name: String },
}

#[derive(Args)]
struct SearchArgs {
    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Text the description must contain
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    vendor: Option<String>,

    /// Exact signed amount
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<Amount>,
}

impl From<View> for Report {
    fn from(view: View) -> Self {
        match view {
            View::All => Report::All,
            View::Deposits => Report::Deposits,
            View::Payments => Report::Payments,
        }
    }
}

impl From<ReportCommand> for Report {
    fn from(command: ReportCommand) -> Self {
        match command {
            ReportCommand::MonthToDate => Report::MonthToDate,
            ReportCommand::PreviousMonth => Report::PreviousMonth,
            ReportCommand::YearToDate => Report::YearToDate,
            ReportCommand::PreviousYear => Report::PreviousYear,
            ReportCommand::Vendor { name } => Report::Vendor(name),
        }
    }
}

impl From<SearchArgs> for CustomQuery {
    fn from(args: SearchArgs) -> Self {
        CustomQuery {
            start_date: args.from,
            end_date: args.to,
            description: args.description,
            vendor: args.vendor,
            amount: args.amount,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let window = if cli.calendar {
        Window::Calendar
    } else {
        Window::Rolling
    };
    let config = LedgerConfig::with_data_dir(&cli.data_dir).window(window);
    let mut store = LedgerStore::open(&config, &cli.user)?;
    let now = Local::now().naive_local();

    match cli.command {
        Command::Deposit(entry) => record(&mut store, TxKind::Deposit, entry, now),
        Command::Payment(entry) => record(&mut store, TxKind::Payment, entry, now),
        Command::Ledger { view } => {
            print_report(&store, &view.into(), now.date(), window);
            Ok(())
        }
        Command::Report(command) => {
            print_report(&store, &command.into(), now.date(), window);
            Ok(())
        }
        Command::Search(args) => {
            print_report(&store, &Report::Custom(args.into()), now.date(), window);
            Ok(())
        }
        Command::Balance => {
            println!("Balance: {}", running_total(store.transactions()));
            Ok(())
        }
    }
}

fn record(
    store: &mut LedgerStore,
    kind: TxKind,
    entry: EntryArgs,
    now: NaiveDateTime,
) -> Result<()> {
    let outcome = match (entry.date, entry.time) {
        (Some(date), Some(time)) => store.record(
            date,
            time,
            &entry.description,
            &entry.vendor,
            kind.signed(entry.amount),
        )?,
        _ => store.record_now(kind, &entry.description, &entry.vendor, entry.amount, now)?,
    };

    match outcome {
        AppendOutcome::Persisted => {
            if let Some(tx) = store.transactions().last() {
                println!("Recorded {}", format_row(tx));
            }
            println!("Balance: {}", running_total(store.transactions()));
            Ok(())
        }
        AppendOutcome::MemoryOnly(e) => Err(e),
    }
}

fn print_report(store: &LedgerStore, report: &Report, today: NaiveDate, window: Window) {
    let rows = report.select(store.transactions(), today, window);

    println!("{}:", report);
    if rows.is_empty() {
        println!("No transactions found");
    }
    for tx in &rows {
        println!("{}", format_row(tx));
    }
    println!("Balance: {}", running_total(store.transactions()));
}

fn format_row(tx: &Transaction) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        tx.date().format(DATE_FORMAT),
        tx.time().format(TIME_FORMAT),
        tx.description(),
        tx.vendor(),
        tx.amount()
    )
}
