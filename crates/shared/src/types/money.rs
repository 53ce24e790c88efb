//! Money type with fixed cent precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` and always carries exactly two
//! fractional digits, so one minor unit is one cent.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of fractional digits in a [`Money`] value.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Errors raised while constructing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// The value has more fractional digits than a cent allows.
    #[error("Amount {0} has more than 2 decimal places")]
    SubCentPrecision(Decimal),

    /// The value could not be parsed as a decimal number.
    #[error("Invalid amount: {0}")]
    Parse(String),
}

/// A monetary amount with exactly two decimal places.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
/// Equality and ordering compare the numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// One cent, the smallest representable increment.
    #[must_use]
    pub fn cent() -> Self {
        Self::from_cents(1)
    }

    /// Creates an amount from a count of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, MINOR_UNIT_SCALE))
    }

    /// Creates an amount from a decimal that is already cent-exact.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::SubCentPrecision`] if the value carries
    /// non-zero digits beyond the second decimal place.
    pub fn try_from_decimal(value: Decimal) -> Result<Self, MoneyError> {
        if value.normalize().scale() > MINOR_UNIT_SCALE {
            return Err(MoneyError::SubCentPrecision(value));
        }
        Ok(Self::rescaled(value))
    }

    /// Creates an amount by rounding to the cent, half away from zero.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use divvy_shared::types::Money;
    ///
    /// assert_eq!(Money::from_decimal_rounded(dec!(10.005)), Money::from_cents(1001));
    /// assert_eq!(Money::from_decimal_rounded(dec!(10.004)), Money::from_cents(1000));
    /// ```
    #[must_use]
    pub fn from_decimal_rounded(value: Decimal) -> Self {
        Self::rescaled(
            value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Creates an amount by rounding toward zero to the cent.
    #[must_use]
    pub fn from_decimal_truncated(value: Decimal) -> Self {
        Self::rescaled(value.round_dp_with_strategy(MINOR_UNIT_SCALE, RoundingStrategy::ToZero))
    }

    fn rescaled(mut value: Decimal) -> Self {
        value.rescale(MINOR_UNIT_SCALE);
        Self(value)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount as a count of cents, if it fits in an `i64`.
    #[must_use]
    pub fn cents(&self) -> Option<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns true if the amount is above zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts two amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiplies by a whole count, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul_count(self, count: usize) -> Option<Self> {
        let count = u64::try_from(count).ok()?;
        self.0.checked_mul(Decimal::from(count)).map(Self)
    }

    /// Divides by a whole count, rounding toward zero to the cent.
    ///
    /// Returns `None` when `count` is zero.
    #[must_use]
    pub fn checked_div_floor(self, count: usize) -> Option<Self> {
        let count = u64::try_from(count).ok()?;
        self.0
            .checked_div(Decimal::from(count))
            .map(Self::from_decimal_truncated)
    }

    /// Computes `percentage` percent of this amount, rounded half up to the cent.
    ///
    /// Returns `None` if the intermediate product overflows.
    #[must_use]
    pub fn checked_percentage(self, percentage: Decimal) -> Option<Self> {
        self.0
            .checked_mul(percentage)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            .map(Self::from_decimal_rounded)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::try_from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(MINOR_UNIT_SCALE);
        write!(f, "{value}")
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|e| MoneyError::Parse(e.to_string()))?;
        Self::try_from_decimal(value)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_from_decimal(value).map_err(serde::de::Error::custom)
    }
}
