//! Monetary amounts.

use serde::{Deserialize, Serialize};

/// Money amount represented in cents to avoid floating point issues.
///
/// Wire formats carry decimal major units (`12.34`); conversion happens at the
/// edges through [`Money::from_major`] and [`Money::as_major`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Converts a decimal major-unit amount, rounding to the nearest cent.
    ///
    /// Returns `None` for NaN, infinities, negative amounts and values that do
    /// not fit in the cent range.
    pub fn from_major(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents >= i64::MAX as f64 {
            return None;
        }
        Some(Self {
            cents: cents as i64,
        })
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the amount in major units, for wire formats.
    pub fn as_major(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds another amount, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.cents.checked_add(other.cents).map(Money::from_cents)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_major_rounds_to_nearest_cent() {
        assert_eq!(Money::from_major(99.99).unwrap().cents(), 9999);
        assert_eq!(Money::from_major(19.999).unwrap().cents(), 2000);
        assert_eq!(Money::from_major(12.0).unwrap().cents(), 1200);
        assert_eq!(Money::from_major(0.0).unwrap(), Money::zero());
    }

    #[test]
    fn from_major_rejects_unusable_amounts() {
        assert!(Money::from_major(-1.0).is_none());
        assert!(Money::from_major(f64::NAN).is_none());
        assert!(Money::from_major(f64::INFINITY).is_none());
        assert!(Money::from_major(1e300).is_none());
    }

    #[test]
    fn from_major_rejects_amounts_that_round_to_the_cent_limit() {
        // 92233720368547760.00 * 100 rounds to exactly 2^63 as an f64.
        assert!(Money::from_major(92_233_720_368_547_760.0).is_none());
        assert!(Money::from_major(92_233_720_368_547_744.0).is_some());
    }

    #[test]
    fn as_major_inverts_cents() {
        assert_eq!(Money::from_cents(2599).as_major(), 25.99);
    }

    #[test]
    fn display_formats_dollars_and_cents() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn checked_arithmetic() {
        let price = Money::from_cents(1000);
        assert_eq!(price.checked_mul(3).unwrap().cents(), 3000);
        assert!(Money::from_cents(i64::MAX).checked_mul(2).is_none());
        assert!(Money::from_cents(i64::MAX).checked_add(price).is_none());
    }
}
