//! Money types with precise decimal arithmetic
//!
//! Compensation under the regulation is a fixed amount in euros, but
//! settlements negotiated with an airline may be paid in the carrier's
//! local currency. Amounts use rust_decimal so no floating-point error
//! creeps into what a passenger is owed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    EUR,
    GBP,
    CHF,
    SEK,
    DKK,
    NOK,
    PLN,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CHF => "CHF",
            Currency::SEK | Currency::DKK | Currency::NOK => "kr",
            Currency::PLN => "zł",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CHF => "CHF",
            Currency::SEK => "SEK",
            Currency::DKK => "DKK",
            Currency::NOK => "NOK",
            Currency::PLN => "PLN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "CHF" => Ok(Currency::CHF),
            "SEK" => Ok(Currency::SEK),
            "DKK" => Ok(Currency::DKK),
            "NOK" => Ok(Currency::NOK),
            "PLN" => Ok(Currency::PLN),
            other => Err(MoneyError::UnknownCurrency(other.to_string())),
        }
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value, rounded to the currency's decimal places
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(currency.decimal_places()),
            currency,
        }
    }

    /// Creates Money from a whole number of major units (e.g. 250 EUR)
    pub fn from_major(units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(units, 0), currency)
    }

    /// Creates a euro amount
    pub fn eur(units: i64) -> Self {
        Self::from_major(units, Currency::EUR)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Validates that the amount can be offered to a passenger
    pub fn ensure_positive(self) -> Result<Self, MoneyError> {
        if self.is_positive() {
            Ok(self)
        } else {
            Err(MoneyError::InvalidAmount(format!(
                "{} must be greater than zero",
                self
            )))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_never_exceeds_currency_precision(
            cents in -1_000_000_000i64..1_000_000_000i64,
            extra in 0u32..6
        ) {
            let amount = Decimal::new(cents, 2 + extra);
            let money = Money::new(amount, Currency::EUR);

            prop_assert!(money.amount().scale() <= Currency::EUR.decimal_places());
            prop_assert!((money.amount() - amount).abs() <= dec!(0.005));
        }

        #[test]
        fn ensure_positive_agrees_with_sign(units in -10_000i64..10_000i64) {
            let money = Money::eur(units);

            prop_assert_eq!(money.ensure_positive().is_ok(), units > 0);
        }
    }
}
