//! Rate value object - non-negative fractional rates (0.10 for 10%).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A non-negative rate expressed as a fraction of one.
///
/// Used for service-charge and tax rates supplied per call; rates are never
/// hardcoded in the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    /// Zero rate.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a Rate, returning error if negative.
    pub fn try_new(value: Decimal) -> Result<Self, ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::negative("rate", value));
        }
        Ok(Self(value))
    }

    /// Creates a Rate from a whole percentage (10 -> 0.10).
    pub fn from_percent(percent: u32) -> Self {
        Self(Decimal::new(i64::from(percent), 2))
    }

    /// Returns the rate as a fraction.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `1 + rate`, the multiplier form.
    pub fn one_plus(&self) -> Decimal {
        Decimal::ONE + self.0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
