pub mod transaction_service;

pub use transaction_service::{ServiceError, ServiceResult, TransactionService};
