use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::BigDecimal;
use sqlx::FromRow;

/// Storage representation of a transaction, one row of `transactions`.
///
/// `transaction_type` and `status` are stored as their canonical upper-case
/// names. `id` and `created_at` are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Option<i64>,
    pub account_number: String,
    pub amount: BigDecimal,
    pub transaction_type: String,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}
