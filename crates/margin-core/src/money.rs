//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    150 * 0.15 = 22.499999999999996  ❌ commission drifts               │
//! │                                                                         │
//! │  Summed over six fee components per channel and nine channels per      │
//! │  product, the drift shows up as margins that differ between the        │
//! │  browser and the server.                                               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    15000 cents × 1500 bps / 10000 = 2250 cents, exactly                │
//! │    Any rounding happens once, at a documented step                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use margin_core::money::Money;
//! use margin_core::types::Percent;
//!
//! let price = Money::from_cents(15000); // R$150.00
//! let commission = price.percent_of(Percent::from_bps(1500)); // 15%
//! assert_eq!(commission.cents(), 2250);
//!
//! // NEVER do this:
//! // let bad = Money::from_float(150.0); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (centavos).
///
/// Signed so that gross and net profit can go below zero; every *input*
/// amount is validated non-negative before it reaches the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use margin_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal string such as `"150"`, `"150.5"` or `"-12.30"`.
    ///
    /// At most two fractional digits are accepted; anything finer cannot be
    /// represented in cents and is rejected instead of silently rounded.
    ///
    /// ## Example
    /// ```rust
    /// use margin_core::money::Money;
    ///
    /// assert_eq!(Money::parse("150.5", "sellingPrice").unwrap().cents(), 15050);
    /// assert!(Money::parse("1.234", "sellingPrice").is_err());
    /// ```
    pub fn parse(input: &str, field: &str) -> Result<Self, ValidationError> {
        parse_hundredths(input, field).map(Money)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (reais) portion, truncated toward zero.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is strictly less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage to this amount, rounding to the nearest cent.
    ///
    /// ## Rounding
    /// ```text
    /// amount_cents × bps / 10000, half away from zero
    ///
    ///   R$10.00 × 8.25%  = 82.5 cents  → 83 cents
    ///  -R$10.00 × 8.25%  = -82.5 cents → -83 cents   (symmetric)
    /// ```
    /// Every percentage-of step in the calculator (commission, advertising,
    /// tax) goes through this one function so they all round alike.
    ///
    /// ## Example
    /// ```rust
    /// use margin_core::money::Money;
    /// use margin_core::types::Percent;
    ///
    /// let tax = Money::from_cents(1000).percent_of(Percent::from_bps(825));
    /// assert_eq!(tax.cents(), 83);
    /// ```
    pub fn percent_of(&self, rate: Percent) -> Money {
        // i128 so that price × bps never overflows
        let cents = div_round_half_away(self.0 as i128 * rate.bps() as i128, 10_000);
        Money(cents as i64)
    }
}

// =============================================================================
// Rounding
// =============================================================================

/// Integer division rounding half away from zero.
///
/// `den` must be non-zero; callers guard the zero case themselves because
/// each one defines a different fallback.
pub(crate) fn div_round_half_away(num: i128, den: i128) -> i128 {
    debug_assert!(den != 0, "division by zero in div_round_half_away");
    let negative = (num < 0) != (den < 0);
    let (num, den) = (num.abs(), den.abs());
    let quotient = (num * 2 + den) / (den * 2);
    if negative {
        -quotient
    } else {
        quotient
    }
}

/// Parses a decimal string into hundredths (cents or basis points).
pub(crate) fn parse_hundredths(input: &str, field: &str) -> Result<i64, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("must be a decimal number"));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid("must be a decimal number"));
    }
    if fraction.len() > 2 {
        return Err(invalid("at most two decimal places are allowed"));
    }

    let whole: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid("value is too large"))?
    };
    let mut hundredths: i64 = fraction.parse().unwrap_or(0);
    if fraction.len() == 1 {
        hundredths *= 10;
    }

    let value = whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(hundredths))
        .ok_or_else(|| invalid("value is too large"))?;

    Ok(if negative { -value } else { value })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display; the frontend does localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}R${}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.units(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "R$5.00");
        assert_eq!(Money::from_cents(-1500).to_string(), "-R$15.00");
        assert_eq!(Money::zero().to_string(), "R$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((b - a).cents(), -500);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_percent_of_exact() {
        // 150.00 × 15% = 22.50
        let price = Money::from_cents(15000);
        assert_eq!(price.percent_of(Percent::from_bps(1500)).cents(), 2250);
    }

    #[test]
    fn test_percent_of_rounds_half_away_from_zero() {
        // 10.00 × 8.25% = 0.825 → 0.83
        assert_eq!(Money::from_cents(1000).percent_of(Percent::from_bps(825)).cents(), 83);
        assert_eq!(Money::from_cents(-1000).percent_of(Percent::from_bps(825)).cents(), -83);
        // 0.10 × 12% = 0.012 → 0.01
        assert_eq!(Money::from_cents(10).percent_of(Percent::from_bps(1200)).cents(), 1);
    }

    #[test]
    fn test_div_round_half_away() {
        assert_eq!(div_round_half_away(5, 10), 1);
        assert_eq!(div_round_half_away(4, 10), 0);
        assert_eq!(div_round_half_away(-5, 10), -1);
        assert_eq!(div_round_half_away(-4, 10), 0);
        assert_eq!(div_round_half_away(7, -2), -4);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("150", "price").unwrap().cents(), 15000);
        assert_eq!(Money::parse("150.5", "price").unwrap().cents(), 15050);
        assert_eq!(Money::parse("0.07", "price").unwrap().cents(), 7);
        assert_eq!(Money::parse(" -12.30 ", "price").unwrap().cents(), -1230);
        assert_eq!(Money::parse(".5", "price").unwrap().cents(), 50);

        assert!(matches!(
            Money::parse("", "price"),
            Err(ValidationError::Required { .. })
        ));
        assert!(Money::parse("1.234", "price").is_err());
        assert!(Money::parse("12,50", "price").is_err());
        assert!(Money::parse("abc", "price").is_err());
        assert!(Money::parse(".", "price").is_err());
    }
}
