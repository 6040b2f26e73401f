//! Conversion arithmetic over a fetched rate table.

use std::fmt;

use thiserror::Error;

use crate::rates::RateTable;

/// Classified failures for amount validation and conversion. These are
/// user input problems, never fatal.
#[derive(Debug, Error, PartialEq)]
pub enum ConvertError {
    #[error("Invalid amount entered. Please enter a numeric value.")]
    InvalidAmount,

    #[error("Please enter a non-negative amount.")]
    NegativeAmount,

    #[error("Please select both currencies.")]
    MissingSelection,

    #[error("Error during conversion: {0}")]
    Arithmetic(String),
}

/// A completed conversion. The numeric value is kept unrounded; only
/// the rendering is fixed to two decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub value: f64,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} {} = {:.2} {}",
            self.amount, self.from, self.value, self.to
        )
    }
}

/// Validates a raw amount string. No rate table access happens here.
pub fn parse_amount(input: &str) -> Result<f64, ConvertError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::InvalidAmount);
    }

    let amount: f64 = trimmed.parse().map_err(|_| ConvertError::InvalidAmount)?;
    if !amount.is_finite() {
        return Err(ConvertError::InvalidAmount);
    }
    if amount < 0.0 {
        return Err(ConvertError::NegativeAmount);
    }

    Ok(amount)
}

/// Converts `amount` from one currency to another using `table`.
pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    table: &RateTable,
) -> Result<Conversion, ConvertError> {
    if !amount.is_finite() {
        return Err(ConvertError::InvalidAmount);
    }
    if amount < 0.0 {
        return Err(ConvertError::NegativeAmount);
    }

    // Identity conversion needs no rate lookup.
    if from == to {
        return Ok(Conversion {
            amount,
            from: from.to_string(),
            to: to.to_string(),
            value: amount,
        });
    }

    let from_rate = table.rate(from).ok_or(ConvertError::MissingSelection)?;
    let to_rate = table.rate(to).ok_or(ConvertError::MissingSelection)?;

    // The table only stores rates relative to the base currency, so a
    // cross rate always goes through it.
    let value = amount / from_rate * to_rate;
    if !value.is_finite() {
        return Err(ConvertError::Arithmetic(format!(
            "{amount} {from} to {to} produced a non-finite value"
        )));
    }

    Ok(Conversion {
        amount,
        from: from.to_string(),
        to: to.to_string(),
        value,
    })
}
