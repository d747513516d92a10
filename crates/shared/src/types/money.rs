//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of decimal places for settlement amounts (cents).
pub const CENT_PLACES: u32 = 2;

/// Rounds an amount to cents using Banker's Rounding.
///
/// Every stored or displayed settlement figure passes through this function,
/// so recomputing the same inputs always yields the same cents.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in major units (e.g., reais), rounded to cents.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Brazilian Real
    #[default]
    Brl,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
}

impl Money {
    /// Creates a new Money instance, rounding the amount to cents.
    #[must_use]
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: round_cents(amount),
            currency,
        }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:.2}", self.currency, self.amount)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brl => write!(f, "BRL"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BRL" => Ok(Self::Brl),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_round_cents_bankers() {
        assert_eq!(round_cents(dec!(2.345)), dec!(2.34));
        assert_eq!(round_cents(dec!(2.355)), dec!(2.36));
        assert_eq!(round_cents(dec!(-2.345)), dec!(-2.34));
        assert_eq!(round_cents(dec!(1500)), dec!(1500));
    }

    #[test]
    fn test_money_new_rounds() {
        let money = Money::new(dec!(100.005), Currency::Brl);
        assert_eq!(money.amount, dec!(100.00));
        assert_eq!(money.currency, Currency::Brl);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Brl);
        assert!(money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_money_is_negative() {
        assert!(Money::new(dec!(-10), Currency::Brl).is_negative());
        assert!(!Money::new(dec!(10), Currency::Brl).is_negative());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(dec!(1350), Currency::Brl).to_string(), "BRL 1350.00");
    }

    #[test]
    fn test_currency_default_is_brl() {
        assert_eq!(Currency::default(), Currency::Brl);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("BRL").unwrap(), Currency::Brl);
        assert_eq!(Currency::from_str("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("EUR").unwrap(), Currency::Eur);
        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }
}
