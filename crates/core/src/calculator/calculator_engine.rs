use crate::constants::ROUNDING_FACTOR;
use crate::errors::CalculatorError;

use super::calculator_model::{CalculationInput, CalculationResult};

/// Rounds to three decimals, half away from zero.
///
/// Magnitudes too large to scale are already whole numbers and come back
/// unchanged.
pub fn round3(value: f64) -> f64 {
    let scaled = value * ROUNDING_FACTOR;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / ROUNDING_FACTOR
}

/// Computes the profit breakdown for a trade.
///
/// Rounding is chained: each figure is rounded before it feeds the next one.
///
/// 1. `profit = round3(market - purchase)`
/// 2. `net_profit = round3(profit - app_fees - third_party_fee)`
/// 3. `purifying_amount = round3(profit * pct / 100)`, only when `profit > 0`
/// 4. `final_profit = round3(net_profit - purifying_amount)`
///
/// Returns [`CalculatorError::NotComputable`] when the purchase or market
/// value is not a finite number, or when a computed figure overflows.
pub fn calculate(input: &CalculationInput) -> Result<CalculationResult, CalculatorError> {
    if !input.purchase_value.is_finite() {
        return Err(CalculatorError::NotComputable("purchaseValue".to_string()));
    }
    if !input.market_value.is_finite() {
        return Err(CalculatorError::NotComputable("marketValue".to_string()));
    }

    let profit = finite(
        gross_profit(input.purchase_value, input.market_value),
        "profit",
    )?;
    let net_profit = finite(
        net_profit(
            profit,
            input.app_fees_or_zero(),
            input.third_party_fee_or_zero(),
        ),
        "netProfit",
    )?;
    let purifying_amount = finite(
        purifying_amount(profit, input.purifying_percentage_or_zero()),
        "purifyingAmount",
    )?;
    let final_profit = finite(final_profit(net_profit, purifying_amount), "finalProfit")?;

    Ok(CalculationResult {
        profit,
        net_profit,
        purifying_amount,
        final_profit,
    })
}

fn finite(value: f64, field: &str) -> Result<f64, CalculatorError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculatorError::NotComputable(field.to_string()))
    }
}

fn gross_profit(purchase_value: f64, market_value: f64) -> f64 {
    round3(market_value - purchase_value)
}

fn net_profit(profit: f64, app_fees: f64, third_party_fee: f64) -> f64 {
    round3(profit - app_fees - third_party_fee)
}

fn purifying_amount(profit: f64, purifying_percentage: f64) -> f64 {
    if profit > 0.0 {
        round3(profit * (purifying_percentage / 100.0))
    } else {
        0.0
    }
}

fn final_profit(net_profit: f64, purifying_amount: f64) -> f64 {
    round3(net_profit - purifying_amount)
}
