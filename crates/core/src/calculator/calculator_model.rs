//! Calculator domain models.

use serde::{Deserialize, Serialize};

use crate::entries::SavedEntry;

/// Raw inputs for a single profit calculation.
///
/// Only `purchase_value` and `market_value` are required. The remaining
/// fields are lenient: a missing or non-finite value counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    pub purchase_value: f64,
    pub market_value: f64,
    pub app_fees: Option<f64>,
    pub third_party_fee: Option<f64>,
    pub purifying_percentage: Option<f64>,
}

impl CalculationInput {
    pub fn new(purchase_value: f64, market_value: f64) -> Self {
        Self {
            purchase_value,
            market_value,
            ..Default::default()
        }
    }

    pub fn with_app_fees(mut self, app_fees: f64) -> Self {
        self.app_fees = Some(app_fees);
        self
    }

    pub fn with_third_party_fee(mut self, third_party_fee: f64) -> Self {
        self.third_party_fee = Some(third_party_fee);
        self
    }

    pub fn with_purifying_percentage(mut self, purifying_percentage: f64) -> Self {
        self.purifying_percentage = Some(purifying_percentage);
        self
    }

    /// Rebuilds the input of a saved entry for re-editing.
    ///
    /// The editor works with a single fee total, so the third-party fee is
    /// folded into `app_fees`.
    pub fn from_entry(entry: &SavedEntry) -> Self {
        Self {
            purchase_value: entry.purchase_value,
            market_value: entry.market_value,
            app_fees: Some(entry.app_fees + entry.third_party_fee),
            third_party_fee: Some(0.0),
            purifying_percentage: Some(entry.purifying_percentage),
        }
    }

    pub fn app_fees_or_zero(&self) -> f64 {
        finite_or_zero(self.app_fees)
    }

    pub fn third_party_fee_or_zero(&self) -> f64 {
        finite_or_zero(self.third_party_fee)
    }

    pub fn purifying_percentage_or_zero(&self) -> f64 {
        finite_or_zero(self.purifying_percentage)
    }
}

/// Profit breakdown produced by [`calculate`](super::calculate).
///
/// Every field is rounded to three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub profit: f64,
    pub net_profit: f64,
    pub purifying_amount: f64,
    pub final_profit: f64,
}

/// How the caller supplies the market value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "mode")]
pub enum MarketValueSource {
    Direct {
        market_value: f64,
    },
    Shares {
        number_of_shares: f64,
        share_price: f64,
    },
}

impl MarketValueSource {
    /// Resolves the scalar market value. A non-finite operand yields a
    /// non-finite result, which the calculator rejects.
    pub fn resolve(&self) -> f64 {
        match *self {
            MarketValueSource::Direct { market_value } => market_value,
            MarketValueSource::Shares {
                number_of_shares,
                share_price,
            } => number_of_shares * share_price,
        }
    }
}

/// A single named fee line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeItem {
    pub name: String,
    pub amount: Option<f64>,
}

/// Fees entered either as one total or as individual items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "mode")]
pub enum FeeBreakdown {
    Total { amount: Option<f64> },
    Itemized { items: Vec<FeeItem> },
}

impl Default for FeeBreakdown {
    fn default() -> Self {
        FeeBreakdown::Total { amount: None }
    }
}

impl FeeBreakdown {
    /// Sums the fees. Missing or non-numeric amounts count as zero.
    pub fn total(&self) -> f64 {
        match self {
            FeeBreakdown::Total { amount } => finite_or_zero(*amount),
            FeeBreakdown::Itemized { items } => items
                .iter()
                .map(|item| finite_or_zero(item.amount))
                .sum(),
        }
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
