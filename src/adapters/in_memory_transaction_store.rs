//! In-memory implementation of TransactionStore.
//! Used by the test suite and by `serve --in-memory`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{NewTransaction, Transaction, TransactionStatus};
use crate::ports::{StoreError, StoreResult, TransactionStore};

#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    records: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, keeping their IDs.
    pub fn with_records(records: Vec<Transaction>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn create(&self, tx: &NewTransaction) -> StoreResult<Transaction> {
        let mut records = self.records.write().await;
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let record = Transaction {
            id,
            user_id: tx.user_id,
            email: tx.email.clone(),
            amount: tx.amount,
            currency: tx.currency.clone(),
            created_at: now,
            changed_at: now,
            status: tx.status,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn get_status(&self, id: i64) -> StoreResult<TransactionStatus> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_email(&self, email: &str) -> StoreResult<Vec<Transaction>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect())
    }

    async fn update_status(&self, id: i64, status: TransactionStatus) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        record.status = status;
        record.changed_at = Utc::now();
        Ok(())
    }
}
