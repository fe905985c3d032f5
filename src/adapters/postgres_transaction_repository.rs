//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::TransactionRecord;
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

const COLUMNS: &str = "id, account_number, amount, transaction_type, description, \
                       transaction_date, status, created_at";

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
        let sql = format!(
            r#"
            INSERT INTO transactions (
                account_number, amount, transaction_type, description, transaction_date, status
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        );

        sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(&record.account_number)
            .bind(&record.amount)
            .bind(&record.transaction_type)
            .bind(&record.description)
            .bind(record.transaction_date)
            .bind(&record.status)
            .fetch_one(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn update(&self, id: i64, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
        let sql = format!(
            r#"
            UPDATE transactions SET
                account_number = $2, amount = $3, transaction_type = $4,
                description = $5, transaction_date = $6, status = $7
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(id)
            .bind(&record.account_number)
            .bind(&record.amount)
            .bind(&record.transaction_type)
            .bind(&record.description)
            .bind(record.transaction_date)
            .bind(&record.status)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)?;

        row.ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn save(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
        match record.id {
            Some(id) => self.update(id, record).await,
            None => self.insert(record).await,
        }
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TransactionRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<TransactionRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions ORDER BY id");
        sqlx::query_as::<_, TransactionRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE account_number = $1 ORDER BY id");
        sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(account_number)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }

    async fn find_by_status(&self, status: &str) -> RepositoryResult<Vec<TransactionRecord>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE status = $1 ORDER BY id");
        sqlx::query_as::<_, TransactionRecord>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::from)
    }
}
