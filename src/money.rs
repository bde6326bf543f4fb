//! Fixed-point money type used for every balance and transfer.
//!
//! Uses `rust_decimal` internally with scale enforcement so that balances
//! accumulated over many expenses never pick up binary floating-point drift.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// A signed monetary amount held at exactly 4 decimal places.
///
/// Four places is the accumulator precision; amounts shown to people are
/// rounded to the currency's minor unit with [`Money::round_to`].
///
/// Arithmetic saturates at [`Money::MAX`] / [`Money::MIN`] instead of
/// panicking, so netting stays total for any parsed amount.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use smartsplit_settle::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
/// assert_eq!(amount.format_dp(2), "10.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places kept by the accumulator.
    pub const SCALE: u32 = 4;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest representable amount.
    pub const MAX: Self = Money(Decimal::MAX);

    /// Smallest representable amount.
    pub const MIN: Self = Money(Decimal::MIN);

    /// Creates a new `Money` from a `Decimal`, normalizing to 4 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut normalized = value;
        normalized.rescale(Self::SCALE);
        Money(normalized)
    }

    /// Creates an amount from integer hundredths (cents for most currencies).
    pub fn from_cents(cents: i64) -> Self {
        Money::new(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    /// Rounds to `dp` decimal places, midpoints away from zero.
    ///
    /// The result is still stored at [`Money::SCALE`] places.
    pub fn round_to(&self, dp: u32) -> Self {
        Money::new(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Number of significant decimal places, ignoring trailing zeros.
    ///
    /// `0.01` has 2, `0.5` has 1, `1` has 0.
    pub fn decimal_places(&self) -> u32 {
        self.0.normalize().scale()
    }

    /// Formats with exactly `dp` decimal places.
    pub fn format_dp(&self, dp: u32) -> String {
        format!("{:.*}", dp as usize, self.round_to(dp).0)
    }

    /// Multiplies by a count, e.g. a per-member tolerance by the member count.
    pub fn times(&self, count: usize) -> Self {
        Money::new(self.0.saturating_mul(Decimal::from(count)))
    }

    /// Returns `true` if `|self| <= tolerance`.
    pub fn is_within(&self, tolerance: Money) -> bool {
        self.abs() <= tolerance
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let decimal = Decimal::from_str(trimmed)?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Money::new(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:.4}", self.0))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Money::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_normalizes_scale() {
        let m = Money::from_str("1.0").unwrap();
        assert_eq!(m.to_string(), "1.0000");

        let m = Money::from_str("  2.5  ").unwrap();
        assert_eq!(m.to_string(), "2.5000");

        let m = Money::from_str("33.3333").unwrap();
        assert_eq!(m.to_string(), "33.3333");
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(3334).to_string(), "33.3400");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.0500");
    }

    #[test]
    fn test_arithmetic_preserves_scale() {
        let a = Money::from_str("1.5").unwrap();
        let b = Money::from_str("2.5").unwrap();

        assert_eq!((a + b).to_string(), "4.0000");
        assert_eq!((b - a).to_string(), "1.0000");
        assert_eq!((-a).to_string(), "-1.5000");
    }

    #[test]
    fn test_round_to_minor_unit() {
        let m = Money::from_str("33.335").unwrap();
        assert_eq!(m.round_to(2), Money::from_cents(3334));

        let m = Money::from_str("-33.335").unwrap();
        assert_eq!(m.round_to(2), Money::from_cents(-3334));

        let m = Money::from_str("0.0049").unwrap();
        assert!(m.round_to(2).is_zero());
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(Money::from_str("0.01").unwrap().decimal_places(), 2);
        assert_eq!(Money::from_str("0.5").unwrap().decimal_places(), 1);
        assert_eq!(Money::from_str("1").unwrap().decimal_places(), 0);
    }

    #[test]
    fn test_format_dp() {
        let m = Money::from_str("10").unwrap();
        assert_eq!(m.format_dp(2), "10.00");
        assert_eq!(m.format_dp(0), "10");

        let m = Money::from_str("0.125").unwrap();
        assert_eq!(m.format_dp(2), "0.13");
    }

    #[test]
    fn test_sum_and_within() {
        let total: Money = [Money::from_cents(100), Money::from_cents(-99)]
            .iter()
            .sum();
        assert_eq!(total, Money::from_cents(1));
        assert!(total.is_within(Money::from_cents(1)));
        assert!(!Money::from_cents(-2).is_within(Money::from_cents(1)));
        assert_eq!(Money::from_cents(1).times(3), Money::from_cents(3));
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let big = Money::from_str("40000000000000000000000000000").unwrap();

        assert_eq!(big + big, Money::MAX);
        assert_eq!(-big - big, Money::MIN);

        let mut acc = big;
        acc += big;
        assert_eq!(acc, Money::MAX);
        acc -= Money::MAX;
        assert!(acc.is_zero());

        assert_eq!(big.times(3), Money::MAX);
    }

    #[test]
    fn test_sign_helpers() {
        assert!(Money::ZERO.is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert_eq!(Money::from_cents(-250).abs(), Money::from_cents(250));
        assert_eq!(
            Money::from_cents(3).min(Money::from_cents(2)),
            Money::from_cents(2)
        );
    }
}
