//! Storage port used by the status engine and handlers.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTransaction, Transaction, TransactionStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for transactions.
///
/// Implementations handle their own concurrency control. Listing operations
/// return records in store order (ascending ID).
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn create(&self, tx: &NewTransaction) -> StoreResult<Transaction>;

    async fn get_status(&self, id: i64) -> StoreResult<TransactionStatus>;

    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>>;

    async fn list_by_email(&self, email: &str) -> StoreResult<Vec<Transaction>>;

    /// Writes `status` and refreshes `changed_at`.
    async fn update_status(&self, id: i64, status: TransactionStatus) -> StoreResult<()>;
}
