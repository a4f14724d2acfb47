//! Fixed-point monetary amount with at least 2 decimal places.
//!
//! Uses `rust_decimal` internally so that ledger totals never pick up
//! floating-point drift. Values are never rounded: a sub-cent amount keeps
//! its digits, and with them its sign.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Neg;
use std::str::FromStr;

/// Largest magnitude, in whole units, that a recorded amount may have.
const MAX_WHOLE_UNITS: i64 = 1_000_000_000_000_000;

/// A signed amount of money, held at 2 decimal places or more.
///
/// Positive values are deposits, negative values are payments.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use pocket_ledger::Amount;
///
/// let amount = Amount::from_str("-10.5").unwrap();
/// assert_eq!(amount.to_string(), "-10.50");
///
/// let fee = Amount::from_str("-0.004").unwrap();
/// assert_eq!(fee.to_string(), "-0.004");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// The minimum number of decimal places kept.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Creates a new `Amount`, padding to 2 decimal places.
    ///
    /// Extra decimal places are kept as they are.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        if normalized.scale() < Self::SCALE {
            normalized.rescale(Self::SCALE);
        }
        if normalized.is_zero() {
            normalized.set_sign_positive(true);
        }
        Amount(normalized)
    }

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Self {
        Amount(self.0.abs())
    }

    /// Returns `true` for zero and positive values.
    pub fn is_non_negative(&self) -> bool {
        !self.0.is_sign_negative() || self.0.is_zero()
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if the magnitude is small enough to be recorded.
    ///
    /// With every record inside this bound a ledger needs more than 10^13
    /// records before its total can leave the range of `Decimal`.
    pub fn is_recordable(&self) -> bool {
        self.0.abs() <= Decimal::new(MAX_WHOLE_UNITS, 0)
    }

    /// Largest magnitude accepted by [`Amount::is_recordable`].
    pub fn max_recordable() -> Self {
        Amount::new(Decimal::new(MAX_WHOLE_UNITS, 0))
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount::new)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        // Ledgers written by floating-point tools may contain `1.0E7`.
        let decimal =
            Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))?;
        Ok(Amount::new(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Amount::new(-self.0)
    }
}

/// Saturates at the bounds of `Decimal` instead of panicking.
impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| Amount::new(acc.0.saturating_add(a.0)))
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
