//! Exact currency amounts.
//!
//! Uses `rust_decimal` internally so royalty sums and balances never pick up
//! floating-point drift. Values travel over JSON as plain numbers.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// A currency amount with exact decimal arithmetic.
///
/// The inner value is kept normalized (no trailing zeros), so whole amounts
/// display and serialize as integers.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use royalty_ledger::Money;
///
/// let royalty = Money::from_units(45);
/// assert_eq!(royalty.times(65).to_string(), "2925");
/// assert_eq!(Money::from_str("10.50").unwrap().to_string(), "10.5");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Largest representable amount.
    pub const MAX: Self = Money(Decimal::MAX);

    /// Smallest (most negative) representable amount.
    pub const MIN: Self = Money(Decimal::MIN);

    /// Creates a new `Money` from a `Decimal`, normalizing its scale.
    pub fn new(value: Decimal) -> Self {
        Money(value.normalize())
    }

    /// Creates a whole-unit amount.
    pub fn from_units(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Multiplies a per-unit amount by a unit count.
    pub fn times(self, count: u64) -> Self {
        Money::new(self.0 * Decimal::from(count))
    }

    /// Converts a float, clamping values beyond the decimal range to
    /// [`Money::MAX`] or [`Money::MIN`]. Returns `None` only for NaN.
    pub fn saturating_from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }

        Some(match Decimal::from_f64(value) {
            Some(decimal) => Money::new(decimal),
            None if value > 0.0 => Money::MAX,
            None => Money::MIN,
        })
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Money::new(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Money::new(self.0 + rhs.0)
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
        Money::new(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
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
        if self.0.scale() == 0 {
            if let Some(whole) = self.0.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }

        match self.0.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom(format!(
                "amount {} is not representable as a JSON number",
                self.0
            ))),
        }
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a numeric amount")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Money, E> {
        Ok(Money::from_units(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Money, E> {
        Ok(Money::new(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Money, E> {
        Decimal::from_f64(v)
            .map(Money::new)
            .ok_or_else(|| E::custom(format!("amount {v} is out of range")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Money, E> {
        Money::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
