//! Quantity value object - positive, possibly fractional assignment quantities.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A positive quantity assigned to a household member.
///
/// Fractional values are allowed so a single unit can be split
/// (e.g. half a shared dish).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// One whole unit, the default assignment quantity.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Creates a Quantity, returning error if zero or negative.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::negative("quantity", value));
        }
        Ok(Self(value))
    }

    /// Creates a Quantity from a whole unit count.
    ///
    /// Returns error when `units` is zero.
    pub fn whole(units: u32) -> Result<Self, ValidationError> {
        Self::try_new(Decimal::from(units))
    }

    /// Returns the quantity as a decimal.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
