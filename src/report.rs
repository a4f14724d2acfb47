//! Filtered views and reports over a ledger.
//!
//! Every report keeps the ledger's original order and never fails; an
//! empty result is the only "nothing found" signal.

use crate::amount::Amount;
use crate::config::Window;
use crate::transaction::Transaction;
use chrono::{Datelike, Months, NaiveDate};
use log::debug;
use std::fmt;

/// A view over the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    All,
    Deposits,
    Payments,

    /// On or after the start of the current month window.
    MonthToDate,

    /// In the calendar month of `today` minus one month.
    PreviousMonth,

    /// On or after the start of the current year window.
    YearToDate,

    /// In the calendar year of `today` minus twelve months.
    PreviousYear,

    /// Vendor equal to the query, ignoring case.
    Vendor(String),

    Custom(CustomQuery),
}

/// Free-form search; every criterion that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomQuery {
    /// Inclusive lower bound.
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound.
    pub end_date: Option<NaiveDate>,

    /// Case-insensitive substring of the description.
    pub description: Option<String>,

    /// Case-insensitive vendor name.
    pub vendor: Option<String>,

    /// Exact signed amount.
    pub amount: Option<Amount>,
}

impl CustomQuery {
    pub fn is_empty(&self) -> bool {
        *self == CustomQuery::default()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.start_date.map_or(true, |start| tx.date() >= start)
            && self.end_date.map_or(true, |end| tx.date() <= end)
            && self.description.as_deref().map_or(true, |needle| {
                tx.description()
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            })
            && self
                .vendor
                .as_deref()
                .map_or(true, |vendor| same_vendor(tx.vendor(), vendor))
            && self.amount.map_or(true, |amount| tx.amount() == amount)
    }
}

#[derive(Debug, Clone, Copy)]
enum Span {
    Month,
    Year,
}

impl Span {
    fn months(self) -> u32 {
        match self {
            Span::Month => 1,
            Span::Year => 12,
        }
    }
}

impl Report {
    /// Returns `true` if `tx` belongs in this report as of `today`.
    pub fn matches(&self, tx: &Transaction, today: NaiveDate, window: Window) -> bool {
        match self {
            Report::All => true,
            Report::Deposits => tx.is_deposit(),
            Report::Payments => tx.is_payment(),
            Report::MonthToDate => tx.date() >= window_start(today, Span::Month, window),
            Report::YearToDate => tx.date() >= window_start(today, Span::Year, window),
            Report::PreviousMonth => {
                let reference = months_back(today, Span::Month.months());
                tx.date().year() == reference.year() && tx.date().month() == reference.month()
            }
            Report::PreviousYear => {
                tx.date().year() == months_back(today, Span::Year.months()).year()
            }
            Report::Vendor(vendor) => same_vendor(tx.vendor(), vendor),
            Report::Custom(query) => query.matches(tx),
        }
    }

    /// Selects the matching records, keeping their ledger order.
    pub fn select<'a>(
        &self,
        transactions: &'a [Transaction],
        today: NaiveDate,
        window: Window,
    ) -> Vec<&'a Transaction> {
        let selected: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| self.matches(tx, today, window))
            .collect();
        debug!(
            "{} selected {} of {} transactions",
            self,
            selected.len(),
            transactions.len()
        );
        selected
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::All => write!(f, "All transactions"),
            Report::Deposits => write!(f, "Deposits"),
            Report::Payments => write!(f, "Payments"),
            Report::MonthToDate => write!(f, "Month to date"),
            Report::PreviousMonth => write!(f, "Previous month"),
            Report::YearToDate => write!(f, "Year to date"),
            Report::PreviousYear => write!(f, "Previous year"),
            Report::Vendor(vendor) => write!(f, "Vendor {}", vendor),
            Report::Custom(_) => write!(f, "Custom search"),
        }
    }
}

/// `today` minus `months` calendar months, clamped to the end of the
/// shorter month (`2024-03-31` minus one month is `2024-02-29`).
fn months_back(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

fn window_start(today: NaiveDate, span: Span, window: Window) -> NaiveDate {
    match (window, span) {
        (Window::Rolling, span) => months_back(today, span.months()),
        (Window::Calendar, Span::Month) => today.with_day(1).unwrap_or(today),
        (Window::Calendar, Span::Year) => today.with_ordinal(1).unwrap_or(today),
    }
}

/// Case-insensitive equality, one character at a time.
///
/// Characters match when they are equal after upper-casing or after
/// lower-casing. Strings of different lengths never match, even when their
/// full lower-case forms agree (`"İ"` against `"i\u{307}"`).
fn same_vendor(a: &str, b: &str) -> bool {
    a.chars().count() == b.chars().count()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            x == y
                || x.to_uppercase().eq(y.to_uppercase())
                || x.to_lowercase().eq(y.to_lowercase())
        })
}

pub fn filter_all(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().collect()
}

pub fn filter_deposits(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().filter(|tx| tx.is_deposit()).collect()
}

pub fn filter_payments(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().filter(|tx| tx.is_payment()).collect()
}

/// Records dated on or after `today` minus one month.
pub fn filter_month_to_date(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<&Transaction> {
    Report::MonthToDate.select(transactions, today, Window::Rolling)
}

pub fn filter_prev_month(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<&Transaction> {
    Report::PreviousMonth.select(transactions, today, Window::Rolling)
}

/// Records dated on or after `today` minus twelve months.
pub fn filter_year_to_date(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<&Transaction> {
    Report::YearToDate.select(transactions, today, Window::Rolling)
}

pub fn filter_prev_year(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<&Transaction> {
    Report::PreviousYear.select(transactions, today, Window::Rolling)
}

pub fn filter_by_vendor<'a>(
    transactions: &'a [Transaction],
    vendor: &str,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|tx| same_vendor(tx.vendor(), vendor))
        .collect()
}

/// Sum of the amounts; zero for an empty sequence.
///
/// Exact for any ledger of recordable amounts and saturating beyond that,
/// so it never panics.
pub fn running_total<'a, I>(transactions: I) -> Amount
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions.into_iter().map(|tx| tx.amount()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(d: NaiveDate, vendor: &str, amount: &str) -> Transaction {
        Transaction::new(
            d,
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            "test",
            vendor,
            Amount::from_str(amount).unwrap(),
        )
        .unwrap()
    }

    fn dates(selected: &[&Transaction]) -> Vec<NaiveDate> {
        selected.iter().map(|tx| tx.date()).collect()
    }

    #[test]
    fn test_months_back_clamps_to_month_end() {
        assert_eq!(months_back(date(2024, 3, 31), 1), date(2024, 2, 29));
        assert_eq!(months_back(date(2023, 3, 31), 1), date(2023, 2, 28));
        assert_eq!(months_back(date(2024, 2, 29), 12), date(2023, 2, 28));
        assert_eq!(months_back(date(2024, 1, 15), 1), date(2023, 12, 15));
    }

    #[test]
    fn test_month_to_date_rolling_boundary() {
        let today = date(2024, 3, 15);
        let ledger = vec![
            tx(date(2024, 2, 14), "a", "1"),
            tx(date(2024, 2, 15), "b", "1"),
            tx(date(2024, 2, 16), "c", "1"),
        ];

        let selected = filter_month_to_date(&ledger, today);
        assert_eq!(dates(&selected), vec![date(2024, 2, 15), date(2024, 2, 16)]);
    }

    #[test]
    fn test_month_to_date_includes_future_dates() {
        let today = date(2024, 3, 15);
        let ledger = vec![tx(date(2024, 4, 1), "a", "1")];
        assert_eq!(filter_month_to_date(&ledger, today).len(), 1);
    }

    #[test]
    fn test_year_to_date_rolling_boundary() {
        let today = date(2024, 3, 15);
        let ledger = vec![
            tx(date(2023, 3, 14), "a", "1"),
            tx(date(2023, 3, 15), "b", "1"),
            tx(date(2023, 3, 16), "c", "1"),
        ];

        let selected = filter_year_to_date(&ledger, today);
        assert_eq!(dates(&selected), vec![date(2023, 3, 15), date(2023, 3, 16)]);
    }

    #[test]
    fn test_previous_month_across_year_boundary() {
        let today = date(2024, 1, 10);
        let ledger = vec![
            tx(date(2023, 12, 1), "a", "1"),
            tx(date(2023, 12, 31), "b", "1"),
            tx(date(2024, 1, 1), "c", "1"),
            tx(date(2022, 12, 15), "d", "1"),
        ];

        let selected = filter_prev_month(&ledger, today);
        assert_eq!(dates(&selected), vec![date(2023, 12, 1), date(2023, 12, 31)]);
    }

    #[test]
    fn test_previous_year() {
        let today = date(2024, 3, 15);
        let ledger = vec![
            tx(date(2022, 12, 31), "a", "1"),
            tx(date(2023, 1, 1), "b", "1"),
            tx(date(2023, 12, 31), "c", "1"),
            tx(date(2024, 1, 1), "d", "1"),
        ];

        let selected = filter_prev_year(&ledger, today);
        assert_eq!(dates(&selected), vec![date(2023, 1, 1), date(2023, 12, 31)]);
    }

    #[test]
    fn test_calendar_window_differs_from_rolling() {
        let today = date(2024, 3, 15);
        let ledger = vec![
            tx(date(2023, 6, 1), "a", "1"),
            tx(date(2024, 2, 20), "b", "1"),
            tx(date(2024, 3, 1), "c", "1"),
        ];

        let rolling = Report::MonthToDate.select(&ledger, today, Window::Rolling);
        let calendar = Report::MonthToDate.select(&ledger, today, Window::Calendar);
        assert_eq!(dates(&rolling), vec![date(2024, 2, 20), date(2024, 3, 1)]);
        assert_eq!(dates(&calendar), vec![date(2024, 3, 1)]);

        let rolling = Report::YearToDate.select(&ledger, today, Window::Rolling);
        let calendar = Report::YearToDate.select(&ledger, today, Window::Calendar);
        assert_eq!(rolling.len(), 3);
        assert_eq!(dates(&calendar), vec![date(2024, 2, 20), date(2024, 3, 1)]);
    }

    #[test]
    fn test_previous_reports_agree_in_both_windows() {
        let today = date(2024, 3, 31);
        let ledger = vec![
            tx(date(2024, 2, 1), "a", "1"),
            tx(date(2024, 2, 29), "b", "1"),
            tx(date(2023, 7, 4), "c", "1"),
        ];

        for report in [Report::PreviousMonth, Report::PreviousYear] {
            assert_eq!(
                report.select(&ledger, today, Window::Rolling),
                report.select(&ledger, today, Window::Calendar)
            );
        }
    }

    #[test]
    fn test_vendor_is_case_insensitive() {
        let ledger = vec![
            tx(date(2024, 1, 1), "Amazon", "-10"),
            tx(date(2024, 1, 2), "Costco", "-20"),
            tx(date(2024, 1, 3), "amazon", "-30"),
        ];

        let selected = filter_by_vendor(&ledger, "AMAZON");
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].vendor(), "Amazon");
        assert_eq!(selected[1].vendor(), "amazon");
        assert!(filter_by_vendor(&ledger, "Amaz").is_empty());
    }

    #[test]
    fn test_vendor_matching_goes_char_by_char() {
        assert!(same_vendor("Amazon", "aMAZON"));
        assert!(same_vendor("CAFÉ", "café"));
        assert!(same_vendor("\u{212A}iosk", "KIOSK"));
        assert!(!same_vendor("İ", "i\u{307}"));
        assert!(!same_vendor("Straße", "STRASSE"));
        assert!(!same_vendor("", "a"));
    }

    #[test]
    fn test_type_filters_partition_ledger() {
        let ledger = vec![
            tx(date(2024, 1, 1), "a", "10"),
            tx(date(2024, 1, 2), "b", "-5"),
            tx(date(2024, 1, 3), "c", "0"),
        ];

        assert_eq!(filter_all(&ledger).len(), 3);
        assert_eq!(
            dates(&filter_deposits(&ledger)),
            vec![date(2024, 1, 1), date(2024, 1, 3)]
        );
        assert_eq!(dates(&filter_payments(&ledger)), vec![date(2024, 1, 2)]);
    }

    #[test]
    fn test_custom_query() {
        let ledger = vec![
            tx(date(2024, 1, 1), "Amazon", "-10"),
            tx(date(2024, 2, 1), "amazon", "-30"),
            tx(date(2024, 3, 1), "Costco", "-30"),
        ];

        let query = CustomQuery {
            start_date: Some(date(2024, 1, 15)),
            vendor: Some("AMAZON".to_string()),
            ..CustomQuery::default()
        };
        let selected =
            Report::Custom(query).select(&ledger, date(2024, 3, 15), Window::Rolling);
        assert_eq!(dates(&selected), vec![date(2024, 2, 1)]);

        let query = CustomQuery {
            end_date: Some(date(2024, 3, 1)),
            description: Some("TES".to_string()),
            amount: Some(Amount::from_str("-30").unwrap()),
            ..CustomQuery::default()
        };
        assert_eq!(
            dates(&ledger.iter().filter(|t| query.matches(t)).collect::<Vec<_>>()),
            vec![date(2024, 2, 1), date(2024, 3, 1)]
        );

        assert!(CustomQuery::default().is_empty());
        assert!(ledger.iter().all(|t| CustomQuery::default().matches(t)));
    }

    #[test]
    fn test_running_total() {
        let ledger = vec![
            tx(date(2024, 1, 1), "a", "100.10"),
            tx(date(2024, 1, 2), "b", "-40.05"),
        ];
        assert_eq!(running_total(&ledger).to_string(), "60.05");
        assert_eq!(running_total(filter_payments(&ledger)).to_string(), "-40.05");
        assert_eq!(running_total(&[] as &[Transaction]), Amount::ZERO);
    }

    #[test]
    fn test_running_total_of_largest_amounts() {
        let ledger = vec![
            tx(date(2024, 1, 1), "a", "1000000000000000"),
            tx(date(2024, 1, 2), "b", "1000000000000000"),
            tx(date(2024, 1, 3), "c", "0.004"),
        ];
        assert_eq!(running_total(&ledger).to_string(), "2000000000000000.004");
    }
}
