//! Wire representations exchanged over HTTP.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::validation;

/// Transaction as seen by API clients.
///
/// Every field is optional on input so that missing values surface as
/// validation errors instead of deserialization failures. `transactionType`
/// and `status` travel as strings and are checked during domain conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionDto {
    pub id: Option<i64>,
    #[schema(example = "ACC-1")]
    pub account_number: Option<String>,
    #[schema(value_type = Option<String>, example = "100.00")]
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Option<BigDecimal>,
    #[schema(example = "DEBIT")]
    pub transaction_type: Option<String>,
    #[schema(example = "Card payment")]
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
    #[schema(example = "COMPLETED")]
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionDto {
    /// Checks the fields a create request must carry and strips control
    /// characters from free text.
    pub fn validate_for_create(mut self) -> Result<Self, validation::ValidationError> {
        self.account_number = self.account_number.as_deref().map(validation::sanitize_string);
        self.description = self.description.as_deref().map(validation::sanitize_string);

        validation::validate_account_number(self.account_number.as_deref().unwrap_or_default())?;
        validation::validate_present("amount", self.amount.as_ref())?;
        validation::validate_required(
            "transactionType",
            self.transaction_type.as_deref().unwrap_or_default(),
        )?;
        validation::validate_description(self.description.as_deref().unwrap_or_default())?;

        Ok(self)
    }
}

/// Accepts the amount as a JSON string or number, reading the number's
/// literal text so no digits pass through `f64`.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::Number(number)) => number.to_string(),
        Some(serde_json::Value::String(text)) => text,
        Some(other) => {
            return Err(de::Error::custom(format!("invalid amount: {}", other)));
        }
    };

    BigDecimal::from_str(raw.trim())
        .map(Some)
        .map_err(|e| de::Error::custom(format!("invalid amount '{}': {}", raw, e)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionFilter {
    pub account_number: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusUpdateQuery {
    /// One of DISPUTED, REVERSED, COMPLETED (case-insensitive).
    pub status: String,
}
