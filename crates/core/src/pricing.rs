//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalPriceError {
    /// A line or cart total does not fit in minor units.
    #[error("total price overflowed")]
    Overflow,
}

/// Calculates `price × quantity` in minor units.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if the product does not fit in an `i64`.
pub fn line_total(price_minor: i64, quantity: u32) -> Result<i64, TotalPriceError> {
    price_minor
        .checked_mul(i64::from(quantity))
        .ok_or(TotalPriceError::Overflow)
}

/// Calculates `Σ price × quantity` over a list of line items.
///
/// An empty list totals to zero in the given currency.
///
/// # Errors
///
/// Returns [`TotalPriceError::Overflow`] if any line total or the running sum overflows.
pub fn total_price(
    items: &[LineItem],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, TotalPriceError> {
    let total = items.iter().try_fold(0_i64, |acc, item| {
        let line = item.line_total()?;

        acc.checked_add(line).ok_or(TotalPriceError::Overflow)
    })?;

    Ok(Money::from_minor(total, currency))
}

/// Converts minor units into a two-decimal-place amount (`29900` -> `299.00`).
pub fn to_decimal(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, 2)
}

/// Converts an amount in major units into minor units.
///
/// Fractions of a cent round to the nearest cent, with exact half-cents rounded away from zero
/// (`0.125` -> `13`).
///
/// Returns `None` if the amount does not fit in an `i64` once scaled.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
}

/// Formats minor units for display, e.g. `$2398.00`.
pub fn format_minor(minor_units: i64, currency: &Currency) -> String {
    format!("{}{}", currency.symbol, to_decimal(minor_units))
}

/// Formats a money amount for display, e.g. `$2398.00`.
pub fn format_money(money: &Money<'_, Currency>) -> String {
    format_minor(money.to_minor_units(), money.currency())
}
