pub mod transaction;

pub use transaction::{
    DomainError, DomainResult, Transaction, TransactionBuilder, TransactionDefaults,
    TransactionStatus, TransactionType,
};
