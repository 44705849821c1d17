//! Saved entry domain models.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calculator::{CalculationInput, CalculationResult};
use crate::constants::DEFAULT_STOCK_NAME;
use crate::errors::ValidationError;

/// A persisted snapshot of one calculation's inputs and results.
///
/// The result fields are stored exactly as given; they are never recomputed
/// from the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntry {
    pub id: String,
    #[serde(with = "saved_at_format")]
    pub saved_at: DateTime<Utc>,
    pub stock_name: String,
    pub purchase_value: f64,
    pub market_value: f64,
    pub app_fees: f64,
    /// Added after the first release. Records without it read back as 0.
    #[serde(default, deserialize_with = "zero_if_missing")]
    pub third_party_fee: f64,
    pub purifying_percentage: f64,
    pub profit: f64,
    pub net_profit: f64,
    pub purifying_amount: f64,
    pub final_profit: f64,
}

impl SavedEntry {
    /// Sum of the app fee and the third-party fee.
    pub fn total_fees(&self) -> f64 {
        self.app_fees + self.third_party_fee
    }
}

/// Input model for saving an entry.
///
/// With an `id` that matches a stored entry the save replaces that entry;
/// otherwise a new entry is created with a freshly generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub id: Option<String>,
    pub stock_name: String,
    pub purchase_value: f64,
    pub market_value: f64,
    pub app_fees: f64,
    #[serde(default)]
    pub third_party_fee: Option<f64>,
    pub purifying_percentage: f64,
    pub profit: f64,
    pub net_profit: f64,
    pub purifying_amount: f64,
    pub final_profit: f64,
}

impl NewEntry {
    /// Builds a save request from a calculation and its result.
    pub fn from_calculation(
        stock_name: impl Into<String>,
        input: &CalculationInput,
        result: &CalculationResult,
    ) -> Self {
        Self {
            id: None,
            stock_name: stock_name.into(),
            purchase_value: input.purchase_value,
            market_value: input.market_value,
            app_fees: input.app_fees_or_zero(),
            third_party_fee: Some(input.third_party_fee_or_zero()),
            purifying_percentage: input.purifying_percentage_or_zero(),
            profit: result.profit,
            net_profit: result.net_profit,
            purifying_amount: result.purifying_amount,
            final_profit: result.final_profit,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Rejects amounts that cannot be stored as JSON numbers.
    pub fn validate(&self) -> crate::errors::Result<()> {
        let amounts = [
            ("purchaseValue", self.purchase_value),
            ("marketValue", self.market_value),
            ("appFees", self.app_fees),
            ("thirdPartyFee", self.third_party_fee.unwrap_or(0.0)),
            ("purifyingPercentage", self.purifying_percentage),
            ("profit", self.profit),
            ("netProfit", self.net_profit),
            ("purifyingAmount", self.purifying_amount),
            ("finalProfit", self.final_profit),
        ];
        match amounts.iter().find(|(_, value)| !value.is_finite()) {
            Some((field, _)) => Err(ValidationError::InvalidInput(format!(
                "{} must be a finite number",
                field
            ))
            .into()),
            None => Ok(()),
        }
    }

    /// Turns the request into a stored entry with the given id and timestamp.
    pub(crate) fn into_saved(self, id: String, saved_at: DateTime<Utc>) -> SavedEntry {
        let stock_name = match self.stock_name.trim() {
            "" => DEFAULT_STOCK_NAME.to_string(),
            trimmed => trimmed.to_string(),
        };

        SavedEntry {
            id,
            saved_at,
            stock_name,
            purchase_value: self.purchase_value,
            market_value: self.market_value,
            app_fees: self.app_fees,
            third_party_fee: self.third_party_fee.unwrap_or(0.0),
            purifying_percentage: self.purifying_percentage,
            profit: self.profit,
            net_profit: self.net_profit,
            purifying_amount: self.purifying_amount,
            final_profit: self.final_profit,
        }
    }
}

/// Current time truncated to the millisecond precision the blob stores.
pub(crate) fn saved_at_now() -> DateTime<Utc> {
    let now = Utc::now();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(millis).unwrap_or(now)
}

/// Default map applied when decoding: a missing or null `thirdPartyFee` is 0.
fn zero_if_missing<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// `savedAt` is stored as an RFC 3339 string with millisecond precision,
/// e.g. `2024-05-01T09:30:00.000Z`.
mod saved_at_format {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
