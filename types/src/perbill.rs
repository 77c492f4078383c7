//! Fixed-point fraction in parts per billion, the on-chain commission encoding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Balance, TypesError};

/// A fraction stored as parts per billion (`1_000_000_000` = 100%).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Perbill(u32);

impl Perbill {
    /// Denominator of the fixed-point encoding.
    pub const ACCURACY: u32 = 1_000_000_000;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(Self::ACCURACY);

    /// Build from raw parts, clamping to 100%.
    pub fn from_parts(parts: u32) -> Self {
        Self(parts.min(Self::ACCURACY))
    }

    /// Build from raw parts, rejecting values above 100%.
    pub fn try_from_parts(parts: u32) -> Result<Self, TypesError> {
        if parts > Self::ACCURACY {
            return Err(TypesError::PerbillOutOfRange(parts));
        }
        Ok(Self(parts))
    }

    /// Build from a whole percentage (e.g. `5` → 5%).
    pub fn from_percent(percent: u32) -> Self {
        Self::from_parts(percent.saturating_mul(Self::ACCURACY / 100))
    }

    /// Raw parts per billion.
    pub fn deconstruct(&self) -> u32 {
        self.0
    }

    /// The fraction in `0..=1`.
    pub fn to_fraction(&self) -> Balance {
        Balance::from(self.0) / Balance::from(Self::ACCURACY)
    }

    /// The fraction as a percentage in `0..=100`.
    pub fn to_percent(&self) -> Balance {
        self.to_fraction() * Balance::ONE_HUNDRED
    }
}

impl TryFrom<u32> for Perbill {
    type Error = TypesError;

    fn try_from(parts: u32) -> Result<Self, Self::Error> {
        Self::try_from_parts(parts)
    }
}

impl From<Perbill> for u32 {
    fn from(p: Perbill) -> Self {
        p.0
    }
}

impl fmt::Display for Perbill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_percent().normalize())
    }
}
