//! Fixed-point money arithmetic with two-digit precision.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BankError, Result};

const CENTS_PER_UNIT: i64 = 100;

/// Amount of money in integer cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn from_units(units: i64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Balance left after applying a proportional tax, rounded to the
    /// nearest cent, half away from zero.
    pub fn after_tax(self, rate: f64) -> Money {
        Money((self.0 as f64 * (1.0 - rate)).round() as i64)
    }

    /// Parses a decimal amount such as `12`, `12.3`, or `€12.34`.
    ///
    /// Negative, malformed, and non-finite inputs are rejected with
    /// [`BankError::InvalidAmount`].
    pub fn parse(input: &str) -> Result<Money> {
        let invalid = || BankError::InvalidAmount(input.trim().to_string());
        let raw = input.trim().trim_start_matches('€').trim();
        if raw.is_empty() {
            return Err(invalid());
        }
        let (units, frac) = match raw.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (raw, ""),
        };
        if units.is_empty() || !units.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units.parse().map_err(|_| invalid())?;
        let frac_cents: i64 = if frac.is_empty() {
            0
        } else {
            format!("{:0<2}", frac).parse().map_err(|_| invalid())?
        };
        Ok(Money(units * CENTS_PER_UNIT + frac_cents))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(
            f,
            "{}€{}.{:02}",
            sign,
            abs / CENTS_PER_UNIT,
            abs % CENTS_PER_UNIT
        )
    }
}
