//! Integer money in the smallest currency unit.
//!
//! Prices, balances and revenue are all whole pence. Discount rates are
//! applied through `rust_decimal` so that scaling is exact before truncation.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// An amount of money counted in pence.
///
/// # Examples
///
/// ```
/// use arcade_engine::Pence;
///
/// let price = Pence::new(1099);
/// assert_eq!(price.to_string(), "£10.99");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pence(i64);

impl Pence {
    /// Zero value.
    pub const ZERO: Self = Pence(0);

    /// Creates an amount from a count of pence.
    pub const fn new(pence: i64) -> Self {
        Pence(pence)
    }

    /// Returns the raw count of pence.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns `true` if this amount is below zero.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Pence)
    }

    /// Subtracts `rhs`, returning `None` on overflow.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Pence)
    }

    /// Multiplies by `rate` exactly, then truncates toward zero.
    ///
    /// Results outside the `i64` range saturate at the nearest bound.
    ///
    /// ```
    /// use arcade_engine::Pence;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Pence::new(215).scale(Decimal::new(5, 1)), Pence::new(107));
    /// ```
    pub fn scale(self, rate: Decimal) -> Self {
        Decimal::from(self.0)
            .checked_mul(rate)
            .and_then(|scaled| scaled.trunc().to_i64())
            .map(Pence)
            .unwrap_or_else(|| {
                if self.is_negative() != rate.is_sign_negative() {
                    Pence(i64::MIN)
                } else {
                    Pence(i64::MAX)
                }
            })
    }
}

impl FromStr for Pence {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Pence)
    }
}

impl fmt::Display for Pence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}£{}.{:02}", sign, magnitude / 100, magnitude % 100)
    }
}

impl Add for Pence {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Pence(self.0 + rhs.0)
    }
}

impl AddAssign for Pence {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Pence {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Pence(self.0 - rhs.0)
    }
}

impl SubAssign for Pence {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Serialize for Pence {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}
