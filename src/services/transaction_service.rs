use std::sync::Arc;

use thiserror::Error;

use crate::domain::{DomainError, Transaction, TransactionStatus};
use crate::mapper::TransactionMapper;
use crate::ports::{RepositoryError, TransactionRepository};
use crate::schemas::TransactionDto;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Orchestrates validate → transition → persist → respond for transactions.
///
/// Holds no mutable state of its own; every call is a single read-modify-write
/// against the repository.
#[derive(Clone)]
pub struct TransactionService {
    repository: Arc<dyn TransactionRepository>,
    mapper: TransactionMapper,
}

impl TransactionService {
    pub fn new(repository: Arc<dyn TransactionRepository>, mapper: TransactionMapper) -> Self {
        Self { repository, mapper }
    }

    pub async fn create(&self, request: TransactionDto) -> ServiceResult<TransactionDto> {
        // identity and creation time belong to the store
        let request = TransactionDto {
            id: None,
            created_at: None,
            ..request
        };

        let tx = self.mapper.dto_to_domain(&request)?;
        let record = self.mapper.domain_to_record(&tx);
        let saved = self.repository.save(&record).await?;

        let created = self.mapper.record_to_domain(&saved)?;
        tracing::info!(
            transaction_id = ?created.id(),
            account_number = %created.account_number(),
            transaction_type = %created.transaction_type(),
            status = %created.status(),
            "Transaction created"
        );

        Ok(self.mapper.domain_to_dto(&created))
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<TransactionDto>> {
        let records = self.repository.find_all().await?;
        self.render(&records)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<TransactionDto>> {
        match self.repository.find_by_id(id).await? {
            Some(record) => Ok(Some(self.mapper.record_to_dto(&record)?)),
            None => Ok(None),
        }
    }

    pub async fn get_by_account(&self, account_number: &str) -> ServiceResult<Vec<TransactionDto>> {
        let records = self
            .repository
            .find_by_account_number(account_number)
            .await?;
        self.render(&records)
    }

    pub async fn get_by_status(&self, status: &str) -> ServiceResult<Vec<TransactionDto>> {
        let status: TransactionStatus = status.parse()?;
        let records = self.repository.find_by_status(status.as_str()).await?;
        self.render(&records)
    }

    /// Applies the transition named by `requested_status`.
    ///
    /// Returns `Ok(None)` when no transaction has `id`. Unknown statuses and
    /// illegal transitions fail before anything is written.
    pub async fn update_status(
        &self,
        id: i64,
        requested_status: &str,
    ) -> ServiceResult<Option<TransactionDto>> {
        let Some(record) = self.repository.find_by_id(id).await? else {
            tracing::debug!(transaction_id = id, "Status update for unknown transaction");
            return Ok(None);
        };

        let current = self.mapper.record_to_domain(&record)?;
        let updated = match apply_transition(&current, requested_status) {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(
                    transaction_id = id,
                    current_status = %current.status(),
                    requested_status,
                    error = %err,
                    "Status transition rejected"
                );
                return Err(err.into());
            }
        };

        let mut next = self.mapper.domain_to_record(&updated);
        next.id = Some(id);
        let saved = self.repository.save(&next).await?;

        tracing::info!(
            transaction_id = id,
            from = %current.status(),
            to = %updated.status(),
            "Transaction status updated"
        );

        Ok(Some(self.mapper.record_to_dto(&saved)?))
    }

    fn render(
        &self,
        records: &[crate::db::models::TransactionRecord],
    ) -> ServiceResult<Vec<TransactionDto>> {
        records
            .iter()
            .map(|record| self.mapper.record_to_dto(record).map_err(ServiceError::from))
            .collect()
    }
}

/// Case-insensitive dispatch from a requested status name to the matching
/// state-machine operation.
fn apply_transition(tx: &Transaction, requested_status: &str) -> Result<Transaction, DomainError> {
    match requested_status.trim().to_ascii_uppercase().as_str() {
        "DISPUTED" => tx.mark_as_disputed(),
        "REVERSED" => tx.reverse(),
        "COMPLETED" => tx.complete(),
        _ => Err(DomainError::InvalidArgument(format!(
            "Invalid status: {}",
            requested_status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTransactionRepository;
    use crate::db::models::TransactionRecord;
    use crate::ports::RepositoryResult;
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts writes so tests can assert the store was left untouched.
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryTransactionRepository,
        saves: AtomicUsize,
    }

    impl CountingRepository {
        fn saves(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TransactionRepository for CountingRepository {
        async fn save(&self, record: &TransactionRecord) -> RepositoryResult<TransactionRecord> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(record).await
        }

        async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<TransactionRecord>> {
            self.inner.find_by_id(id).await
        }

        async fn find_all(&self) -> RepositoryResult<Vec<TransactionRecord>> {
            self.inner.find_all().await
        }

        async fn find_by_account_number(
            &self,
            account_number: &str,
        ) -> RepositoryResult<Vec<TransactionRecord>> {
            self.inner.find_by_account_number(account_number).await
        }

        async fn find_by_status(&self, status: &str) -> RepositoryResult<Vec<TransactionRecord>> {
            self.inner.find_by_status(status).await
        }
    }

    fn setup() -> (TransactionService, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::default());
        let service = TransactionService::new(repo.clone(), TransactionMapper::default());
        (service, repo)
    }

    fn request(account: &str, amount: &str) -> TransactionDto {
        TransactionDto {
            account_number: Some(account.to_string()),
            amount: Some(BigDecimal::from_str(amount).unwrap()),
            transaction_type: Some("DEBIT".to_string()),
            description: Some("test".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_store_fields() {
        let (service, _) = setup();

        let created = service.create(request("ACC-1", "100.00")).await.unwrap();

        assert!(created.id.is_some());
        assert!(created.created_at.is_some());
        assert!(created.transaction_date.is_some());
        assert_eq!(created.status.as_deref(), Some("COMPLETED"));
        assert_eq!(created.account_number.as_deref(), Some("ACC-1"));
        assert_eq!(created.amount, Some(BigDecimal::from_str("100.00").unwrap()));
        assert_eq!(created.transaction_type.as_deref(), Some("DEBIT"));
        assert_eq!(created.description.as_deref(), Some("test"));
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_identity() {
        let (service, _) = setup();
        service.create(request("ACC-1", "1")).await.unwrap();

        let created = service
            .create(TransactionDto {
                id: Some(1),
                ..request("ACC-2", "2")
            })
            .await
            .unwrap();

        assert_eq!(created.id, Some(2));
        assert_eq!(service.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_invalid_persists_nothing() {
        let (service, repo) = setup();

        for bad in [
            request("  ", "10"),
            request("ACC-1", "0"),
            request("ACC-1", "-3"),
            TransactionDto {
                transaction_type: None,
                ..request("ACC-1", "10")
            },
        ] {
            let err = service.create(bad).await.unwrap_err();
            assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        }

        let err = service
            .create(TransactionDto {
                transaction_type: Some("LOAN".to_string()),
                ..request("ACC-1", "10")
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidArgument(_))));

        assert_eq!(repo.saves(), 0);
        assert!(service.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispute_then_reverse() {
        let (service, _) = setup();
        let id = service.create(request("ACC-1", "100.00")).await.unwrap().id.unwrap();

        let disputed = service.update_status(id, "DISPUTED").await.unwrap().unwrap();
        assert_eq!(disputed.status.as_deref(), Some("DISPUTED"));

        let reversed = service.update_status(id, "reversed").await.unwrap().unwrap();
        assert_eq!(reversed.status.as_deref(), Some("REVERSED"));
        assert_eq!(reversed.id, Some(id));

        let fetched = service.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.status.as_deref(), Some("REVERSED"));
        assert_eq!(service.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reverse_without_dispute_fails() {
        let (service, repo) = setup();
        let id = service.create(request("ACC-1", "100.00")).await.unwrap().id.unwrap();

        let err = service.update_status(id, "REVERSED").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidState(_))));

        assert_eq!(repo.saves(), 1);
        let fetched = service.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.status.as_deref(), Some("COMPLETED"));
    }

    #[tokio::test]
    async fn test_dispute_reversed_fails() {
        let (service, _) = setup();
        let id = service.create(request("ACC-1", "5")).await.unwrap().id.unwrap();
        service.update_status(id, "DISPUTED").await.unwrap();
        service.update_status(id, "REVERSED").await.unwrap();

        let err = service.update_status(id, "DISPUTED").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_completed_request_resolves_dispute() {
        let (service, _) = setup();
        let id = service.create(request("ACC-1", "5")).await.unwrap().id.unwrap();
        service.update_status(id, "DISPUTED").await.unwrap();

        let completed = service.update_status(id, "Completed").await.unwrap().unwrap();
        assert_eq!(completed.status.as_deref(), Some("COMPLETED"));
    }

    #[tokio::test]
    async fn test_unknown_status_names_value() {
        let (service, repo) = setup();
        let id = service.create(request("ACC-1", "100.00")).await.unwrap().id.unwrap();

        let err = service.update_status(id, "CANCELLED").await.unwrap_err();
        match err {
            ServiceError::Domain(DomainError::InvalidArgument(msg)) => {
                assert!(msg.contains("CANCELLED"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(repo.saves(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_absent() {
        let (service, repo) = setup();

        assert!(service.update_status(404, "DISPUTED").await.unwrap().is_none());
        assert_eq!(repo.saves(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (service, _) = setup();
        let created = service.create(request("ACC-1", "1.10")).await.unwrap();
        let id = created.id.unwrap();

        let first = service.get_by_id(id).await.unwrap();
        let second = service.get_by_id(id).await.unwrap();
        assert_eq!(first, Some(created));
        assert_eq!(first, second);

        assert!(service.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_filters() {
        let (service, _) = setup();
        let a = service.create(request("ACC-1", "1")).await.unwrap().id.unwrap();
        service.create(request("ACC-1", "2")).await.unwrap();
        service.create(request("ACC-2", "3")).await.unwrap();
        service.update_status(a, "DISPUTED").await.unwrap();

        assert_eq!(service.get_by_account("ACC-1").await.unwrap().len(), 2);
        assert_eq!(service.get_by_account("ACC-2").await.unwrap().len(), 1);
        assert!(service.get_by_account("nope").await.unwrap().is_empty());

        let disputed = service.get_by_status("disputed").await.unwrap();
        assert_eq!(disputed.len(), 1);
        assert_eq!(disputed[0].id, Some(a));
        assert_eq!(service.get_by_status("COMPLETED").await.unwrap().len(), 2);
        assert!(service.get_by_status("PENDING").await.unwrap().is_empty());

        let err = service.get_by_status("LOST").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvalidArgument(_))));
    }
}
