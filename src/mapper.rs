//! Conversions between the wire (`TransactionDto`), domain (`Transaction`)
//! and storage (`TransactionRecord`) representations.
//!
//! Every conversion is total except enum parsing and domain construction,
//! which fail with a `DomainError`.

use std::str::FromStr;

use crate::db::models::TransactionRecord;
use crate::domain::{
    DomainError, DomainResult, Transaction, TransactionDefaults, TransactionStatus,
    TransactionType,
};
use crate::schemas::TransactionDto;

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionMapper {
    defaults: TransactionDefaults,
}

impl TransactionMapper {
    pub fn new(defaults: TransactionDefaults) -> Self {
        Self { defaults }
    }

    pub fn dto_to_domain(&self, dto: &TransactionDto) -> DomainResult<Transaction> {
        Transaction::builder()
            .id(dto.id)
            .account_number(dto.account_number.clone().unwrap_or_default())
            .maybe_amount(dto.amount.clone())
            .maybe_transaction_type(parse_optional(dto.transaction_type.as_deref())?)
            .description(dto.description.clone().unwrap_or_default())
            .transaction_date(dto.transaction_date)
            .maybe_status(parse_optional(dto.status.as_deref())?)
            .created_at(dto.created_at)
            .build_with(&self.defaults)
    }

    pub fn domain_to_dto(&self, tx: &Transaction) -> TransactionDto {
        TransactionDto {
            id: tx.id(),
            account_number: Some(tx.account_number().to_string()),
            amount: Some(tx.amount().clone()),
            transaction_type: Some(tx.transaction_type().to_string()),
            description: Some(tx.description().to_string()),
            transaction_date: Some(tx.transaction_date()),
            status: Some(tx.status().to_string()),
            created_at: tx.created_at(),
        }
    }

    pub fn record_to_domain(&self, record: &TransactionRecord) -> DomainResult<Transaction> {
        Transaction::builder()
            .id(record.id)
            .account_number(record.account_number.clone())
            .amount(record.amount.clone())
            .transaction_type(TransactionType::from_str(&record.transaction_type)?)
            .description(record.description.clone())
            .transaction_date(Some(record.transaction_date))
            .status(TransactionStatus::from_str(&record.status)?)
            .created_at(record.created_at)
            .build_with(&self.defaults)
    }

    /// `created_at` is left to the store.
    pub fn domain_to_record(&self, tx: &Transaction) -> TransactionRecord {
        TransactionRecord {
            id: tx.id(),
            account_number: tx.account_number().to_string(),
            amount: tx.amount().clone(),
            transaction_type: tx.transaction_type().as_str().to_string(),
            description: tx.description().to_string(),
            transaction_date: tx.transaction_date(),
            status: tx.status().as_str().to_string(),
            created_at: None,
        }
    }

    /// Stored row straight to its wire form, validating on the way.
    pub fn record_to_dto(&self, record: &TransactionRecord) -> DomainResult<TransactionDto> {
        self.record_to_domain(record)
            .map(|tx| self.domain_to_dto(&tx))
    }
}

/// Blank strings count as absent.
fn parse_optional<T>(value: Option<&str>) -> DomainResult<Option<T>>
where
    T: FromStr<Err = DomainError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some),
    }
}
