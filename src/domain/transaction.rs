//! Transaction domain entity.
//! Framework-agnostic, validated representation of a ledger transaction and
//! the status state machine it carries.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use crate::validation::{self, ValidationError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::Validation(err.to_string())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Direction of the money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBIT" => Ok(TransactionType::Debit),
            "CREDIT" => Ok(TransactionType::Credit),
            _ => Err(DomainError::InvalidArgument(format!(
                "Invalid transaction type: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Disputed,
    Reversed,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 4] = [
        TransactionStatus::Pending,
        TransactionStatus::Completed,
        TransactionStatus::Disputed,
        TransactionStatus::Reversed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Disputed => "DISPUTED",
            TransactionStatus::Reversed => "REVERSED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionStatus::Reversed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        TransactionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidArgument(format!("Invalid status: {}", s)))
    }
}

/// Values applied by the builder when a field is left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionDefaults {
    pub status: TransactionStatus,
    /// Stamp `transaction_date` with the construction time when unset.
    /// When disabled a missing date fails validation.
    pub stamp_transaction_date: bool,
}

impl Default for TransactionDefaults {
    fn default() -> Self {
        Self {
            status: TransactionStatus::Completed,
            stamp_transaction_date: true,
        }
    }
}

/// Domain entity representing a transaction.
///
/// Values are immutable: every transition returns a new `Transaction` built
/// through [`TransactionBuilder`], so construction validation runs again.
/// Equality and hashing consider only `id`.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: Option<i64>,
    account_number: String,
    amount: BigDecimal,
    transaction_type: TransactionType,
    description: String,
    transaction_date: DateTime<Utc>,
    status: TransactionStatus,
    created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder::default()
    }

    /// Builder seeded with every field of `self`.
    pub fn to_builder(&self) -> TransactionBuilder {
        TransactionBuilder {
            id: self.id,
            account_number: Some(self.account_number.clone()),
            amount: Some(self.amount.clone()),
            transaction_type: Some(self.transaction_type),
            description: Some(self.description.clone()),
            transaction_date: Some(self.transaction_date),
            status: Some(self.status),
            created_at: self.created_at,
        }
    }

    pub fn mark_as_disputed(&self) -> DomainResult<Transaction> {
        if self.status == TransactionStatus::Reversed {
            return Err(DomainError::InvalidState(
                "Cannot dispute a reversed transaction".to_string(),
            ));
        }
        self.with_status(TransactionStatus::Disputed)
    }

    pub fn reverse(&self) -> DomainResult<Transaction> {
        if self.status != TransactionStatus::Disputed {
            return Err(DomainError::InvalidState(
                "Can only reverse disputed transactions".to_string(),
            ));
        }
        self.with_status(TransactionStatus::Reversed)
    }

    /// Settles the transaction, e.g. after a dispute was rejected.
    /// A reversed transaction stays reversed.
    pub fn complete(&self) -> DomainResult<Transaction> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidState(
                "Cannot complete a reversed transaction".to_string(),
            ));
        }
        self.with_status(TransactionStatus::Completed)
    }

    pub fn is_disputed(&self) -> bool {
        self.status == TransactionStatus::Disputed
    }

    pub fn can_be_disputed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    fn with_status(&self, status: TransactionStatus) -> DomainResult<Transaction> {
        self.to_builder().status(status).build()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn transaction_date(&self) -> DateTime<Utc> {
        self.transaction_date
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    id: Option<i64>,
    account_number: Option<String>,
    amount: Option<BigDecimal>,
    transaction_type: Option<TransactionType>,
    description: Option<String>,
    transaction_date: Option<DateTime<Utc>>,
    status: Option<TransactionStatus>,
    created_at: Option<DateTime<Utc>>,
}

impl TransactionBuilder {
    pub fn id(mut self, id: Option<i64>) -> Self {
        self.id = id;
        self
    }

    pub fn account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(account_number.into());
        self
    }

    pub fn amount(mut self, amount: BigDecimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn transaction_date(mut self, transaction_date: Option<DateTime<Utc>>) -> Self {
        self.transaction_date = transaction_date;
        self
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn maybe_status(mut self, status: Option<TransactionStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn maybe_transaction_type(mut self, transaction_type: Option<TransactionType>) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn maybe_amount(mut self, amount: Option<BigDecimal>) -> Self {
        self.amount = amount;
        self
    }

    pub fn created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn build(self) -> DomainResult<Transaction> {
        self.build_with(&TransactionDefaults::default())
    }

    pub fn build_with(self, defaults: &TransactionDefaults) -> DomainResult<Transaction> {
        let account_number = self.account_number.unwrap_or_default();
        if validation::validate_required("accountNumber", &account_number).is_err() {
            return Err(DomainError::Validation(
                "Account number cannot be empty".to_string(),
            ));
        }

        let amount = match self.amount {
            Some(amount) if validation::validate_positive_amount(&amount).is_ok() => amount,
            _ => {
                return Err(DomainError::Validation(
                    "Amount must be greater than zero".to_string(),
                ))
            }
        };

        let transaction_type = self.transaction_type.ok_or_else(|| {
            DomainError::Validation("Transaction type is required".to_string())
        })?;

        let transaction_date = match self.transaction_date {
            Some(date) => date,
            None if defaults.stamp_transaction_date => Utc::now(),
            None => {
                return Err(DomainError::Validation(
                    "Transaction date is required".to_string(),
                ))
            }
        };

        Ok(Transaction {
            id: self.id,
            account_number,
            amount,
            transaction_type,
            description: self.description.unwrap_or_default(),
            transaction_date,
            status: self.status.unwrap_or(defaults.status),
            created_at: self.created_at,
        })
    }
}
