//! Fixed-point money in ledger milliunits.

use std::{fmt, ops::Neg, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliunits per major currency unit.
pub const MILLIUNITS_PER_UNIT: i64 = 1000;

/// Signed money amount represented as **integer milliunits**
/// (`1000` = one unit of currency).
///
/// Provider amounts arrive as decimal strings and ledger amounts leave as
/// integers, so parsing never goes through floating point.
///
/// ```rust
/// use cardsync_core::Milliunits;
///
/// assert_eq!("12.50".parse::<Milliunits>().unwrap().value(), 12_500);
/// assert_eq!(Milliunits::new(-12_500).to_string(), "-12.500");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Milliunits(i64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount: {0:?}")]
    Invalid(String),
    #[error("amount too large: {0:?}")]
    Overflow(String),
}

impl Milliunits {
    pub const ZERO: Milliunits = Milliunits(0);

    #[must_use]
    pub const fn new(milliunits: i64) -> Self {
        Self(milliunits)
    }

    /// Raw value in milliunits.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Two fraction digits, rounded half away from zero: the way balances
    /// are shown to people.
    pub fn to_major_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = (u128::from(self.0.unsigned_abs()) + 5) / 10;
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl fmt::Display for Milliunits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / MILLIUNITS_PER_UNIT as u64;
        let milli = abs % MILLIUNITS_PER_UNIT as u64;
        write!(f, "{sign}{units}.{milli:03}")
    }
}

impl From<i64> for Milliunits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Milliunits> for i64 {
    fn from(value: Milliunits) -> Self {
        value.0
    }
}

impl Neg for Milliunits {
    type Output = Milliunits;

    fn neg(self) -> Self::Output {
        Milliunits(-self.0)
    }
}

impl FromStr for Milliunits {
    type Err = AmountError;

    /// Parses a major-unit decimal string (`"12.50"`, `"-3"`, `"+0.125"`).
    ///
    /// Digits past the third fractional place are truncated toward zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AmountError::Invalid(s.to_string());
        let overflow = || AmountError::Overflow(s.to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let (units_str, frac_str) = match rest.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (rest, ""),
        };

        if units_str.is_empty() && frac_str.is_empty() {
            return Err(invalid());
        }
        if !units_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str.parse().map_err(|_| overflow())?
        };

        let mut milli = 0i64;
        let mut scale = 100i64;
        for digit in frac_str.bytes().take(3) {
            milli += i64::from(digit - b'0') * scale;
            scale /= 10;
        }

        let total = units
            .checked_mul(MILLIUNITS_PER_UNIT)
            .and_then(|v| v.checked_add(milli))
            .ok_or_else(overflow)?;

        Ok(Milliunits(if negative { -total } else { total }))
    }
}
