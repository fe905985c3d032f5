//! In-process implementation of TransactionRepository.
//! Used by `STORE_BACKEND=memory` and by the test suites.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::db::models::TransactionRecord;
use crate::ports::{RepositoryError, RepositoryResult, TransactionRepository};

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, TransactionRecord>,
}

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    table: RwLock<Table>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn select<F>(&self, predicate: F) -> Vec<TransactionRecord>
    where
        F: Fn(&TransactionRecord) -> bool,
    {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn save(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
        let mut table = self.table.write().await;

        let (id, created_at) = match record.id {
            Some(id) => {
                let existing = table
                    .rows
                    .get(&id)
                    .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
                (id, existing.created_at)
            }
            None => {
                table.next_id += 1;
                (table.next_id, Some(Utc::now()))
            }
        };

        let stored = TransactionRecord {
            id: Some(id),
            created_at,
            ..record.clone()
        };
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TransactionRecord>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<TransactionRecord>> {
        Ok(self.select(|_| true).await)
    }

    async fn find_by_account_number(
        &self,
        account_number: &str,
    ) -> RepositoryResult<Vec<TransactionRecord>> {
        Ok(self.select(|row| row.account_number == account_number).await)
    }

    async fn find_by_status(&self, status: &str) -> RepositoryResult<Vec<TransactionRecord>> {
        Ok(self.select(|row| row.status == status).await)
    }
}
