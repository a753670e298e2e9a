//! Overflow-checked monetary amount type.
//!
//! All satoshi quantities in the SDK are carried as [`Satoshi`] values.
//! Arithmetic is explicit and checked: additions and multiplications that
//! would exceed `u64::MAX` fail with [`ExceedsMaximumAmount`] rather than
//! wrapping or saturating, so no value can be silently created or lost.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ExceedsMaximumAmount;

/// A non-negative monetary amount in satoshis.
///
/// Wraps a `u64` and exposes only checked arithmetic. The derived `Ord`
/// compares numeric value, which is also the first component of the
/// canonical output ordering.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Satoshi(u64);

impl Satoshi {
    /// The zero amount.
    pub const ZERO: Satoshi = Satoshi(0);

    /// The largest representable amount.
    pub const MAX: Satoshi = Satoshi(u64::MAX);

    /// Create an amount from a raw satoshi count.
    pub const fn from_sat(satoshis: u64) -> Self {
        Satoshi(satoshis)
    }

    /// Return the raw satoshi count.
    pub const fn to_sat(self) -> u64 {
        self.0
    }

    /// Add two amounts, failing on overflow.
    ///
    /// # Returns
    /// The sum, or [`ExceedsMaximumAmount`] if it does not fit in 64 bits.
    pub fn checked_add(self, rhs: Satoshi) -> Result<Satoshi, ExceedsMaximumAmount> {
        self.0
            .checked_add(rhs.0)
            .map(Satoshi)
            .ok_or(ExceedsMaximumAmount)
    }

    /// Multiply the amount by a scalar factor, failing on overflow.
    ///
    /// Used for fee computation (`size * fee_per_byte`).
    ///
    /// # Returns
    /// The product, or [`ExceedsMaximumAmount`] if it does not fit in 64 bits.
    pub fn checked_mul(self, factor: u64) -> Result<Satoshi, ExceedsMaximumAmount> {
        self.0
            .checked_mul(factor)
            .map(Satoshi)
            .ok_or(ExceedsMaximumAmount)
    }

    /// Subtract another amount, returning `None` if the result would be
    /// negative.
    pub fn checked_sub(self, rhs: Satoshi) -> Option<Satoshi> {
        self.0.checked_sub(rhs.0).map(Satoshi)
    }
}

impl fmt::Display for Satoshi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Satoshi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Satoshi({})", self.0)
    }
}

impl From<u64> for Satoshi {
    fn from(satoshis: u64) -> Self {
        Satoshi(satoshis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_add_in_range() {
        let a = Satoshi::from_sat(6_000);
        let b = Satoshi::from_sat(1_000);
        assert_eq!(a.checked_add(b).unwrap(), Satoshi::from_sat(7_000));
    }

    #[test]
    fn checked_add_overflow_fails() {
        let result = Satoshi::MAX.checked_add(Satoshi::from_sat(1));
        assert_eq!(result, Err(ExceedsMaximumAmount));
    }

    #[test]
    fn checked_mul_in_range() {
        let fee = Satoshi::from_sat(2).checked_mul(250).unwrap();
        assert_eq!(fee, Satoshi::from_sat(500));
    }

    #[test]
    fn checked_mul_overflow_fails() {
        let result = Satoshi::MAX.checked_mul(2);
        assert_eq!(result, Err(ExceedsMaximumAmount));
    }

    #[test]
    fn checked_mul_never_wraps_at_boundary() {
        // u64::MAX is odd, so MAX/2 * 2 fits but (MAX/2 + 1) * 2 does not.
        let half = Satoshi::from_sat(u64::MAX / 2);
        assert!(half.checked_mul(2).is_ok());
        let over = Satoshi::from_sat(u64::MAX / 2 + 1);
        assert_eq!(over.checked_mul(2), Err(ExceedsMaximumAmount));
    }

    #[test]
    fn checked_sub_underflow_is_none() {
        let a = Satoshi::from_sat(100);
        let b = Satoshi::from_sat(101);
        assert_eq!(a.checked_sub(b), None);
        assert_eq!(b.checked_sub(a), Some(Satoshi::from_sat(1)));
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Satoshi::from_sat(1_000) < Satoshi::from_sat(3_000));
        assert!(Satoshi::from_sat(3_000) < Satoshi::from_sat(6_000));
    }

    #[test]
    fn serde_is_transparent() {
        let amount = Satoshi::from_sat(546);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "546");
        let back: Satoshi = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
