//! Fixed-point prices
//!
//! Subscription prices are held as `Decimal` so that monthly totals and
//! category shares add up exactly. **Never use f64 for money.**
//!
//! On disk a price is a plain JSON number (`15.99`), which keeps the
//! persisted slot readable by other clients of the same key.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::str::FromStr;

/// Money amount with fixed-point precision
///
/// # Examples
///
/// ```rust
/// use subtrack_core::Amount;
///
/// let a = Amount::from_str_checked("15.99").unwrap();
/// let b = Amount::from_str_checked("9.99").unwrap();
/// assert_eq!(a.saturating_add(&b).to_string(), "25.98");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount {
    #[serde(with = "rust_decimal::serde::float")]
    value: Decimal,
}

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Whole currency units.
    ///
    /// ```rust
    /// use subtrack_core::Amount;
    /// assert_eq!(Amount::from_units(12).to_string(), "12");
    /// ```
    pub fn from_units(units: i64) -> Self {
        Self {
            value: Decimal::from(units),
        }
    }

    /// Parse a decimal string such as `"123.45"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid decimal.
    pub fn from_str_checked(s: &str) -> Result<Self, String> {
        Decimal::from_str(s.trim())
            .map(|value| Self { value })
            .map_err(|e| format!("Invalid amount: {}", e))
    }

    pub fn zero() -> Self {
        Self {
            value: Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Checked addition (returns None on overflow)
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        self.value
            .checked_add(other.value)
            .map(|value| Self { value })
    }

    /// Saturating addition (clamps to max on overflow)
    pub fn saturating_add(&self, other: &Self) -> Self {
        self.checked_add(other).unwrap_or(Self {
            value: Decimal::MAX,
        })
    }

    /// Checked multiplication by a whole factor (returns None on overflow)
    pub fn multiply(&self, factor: u32) -> Option<Self> {
        self.value
            .checked_mul(Decimal::from(factor))
            .map(|value| Self { value })
    }

    /// Share of `total` that this amount represents, as a whole percent.
    ///
    /// Half-way values round away from zero. Returns None when `total`
    /// is zero.
    ///
    /// ```rust
    /// use subtrack_core::Amount;
    /// let part = Amount::from_units(1);
    /// let total = Amount::from_units(8);
    /// assert_eq!(part.percent_of(&total), Some(13));
    /// assert_eq!(part.percent_of(&Amount::zero()), None);
    /// ```
    pub fn percent_of(&self, total: &Self) -> Option<u32> {
        if total.is_zero() {
            return None;
        }
        let ratio = self.value.checked_div(total.value)?;
        let percent = ratio
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        percent.to_u32()
    }

    /// Two-decimal rendering for display (`25.98`, `1.00`).
    pub fn to_display_string(&self) -> String {
        let rounded = self
            .value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.normalize())
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_checked(s)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, x| acc.saturating_add(&x))
    }
}
