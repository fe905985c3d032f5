//! Ports the core depends on. Adapters live in `crate::adapters`.

use async_trait::async_trait;
use thiserror::Error;

use crate::db::models::TransactionRecord;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence of transaction records.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Inserts the record when `id` is `None`, otherwise overwrites the mutable
    /// columns of the existing row. `created_at` is never overwritten.
    async fn save(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TransactionRecord>>;

    async fn find_all(&self) -> RepositoryResult<Vec<TransactionRecord>>;

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> RepositoryResult<Vec<TransactionRecord>>;

    async fn find_by_status(&self, status: &str) -> RepositoryResult<Vec<TransactionRecord>>;
}
