//! Postgres implementation of TransactionStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{NewTransaction, Transaction, TransactionStatus};
use crate::ports::{StoreError, StoreResult, TransactionStore};

const SELECT_COLUMNS: &str =
    "id, user_id, email, amount, currency, created_at, changed_at, transaction_status";

/// Postgres-backed transaction store.
#[derive(Clone)]
pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn create(&self, tx: &NewTransaction) -> StoreResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO transactions (user_id, email, amount, currency, transaction_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(tx.user_id)
        .bind(&tx.email)
        .bind(tx.amount)
        .bind(&tx.currency)
        .bind(tx.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_domain()
    }

    async fn get_status(&self, id: i64) -> StoreResult<TransactionStatus> {
        let status: Option<String> =
            sqlx::query_scalar("SELECT transaction_status FROM transactions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let status = status.ok_or(StoreError::NotFound(id))?;
        parse_status(&status)
    }

    async fn list_by_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn list_by_email(&self, email: &str) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM transactions WHERE email = $1 ORDER BY id"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }

    async fn update_status(&self, id: i64, status: TransactionStatus) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE transactions SET transaction_status = $1, changed_at = NOW() WHERE id = $2",
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_status(raw: &str) -> StoreResult<TransactionStatus> {
    raw.parse()
        .map_err(|e: crate::domain::UnknownStatus| StoreError::Corrupt(e.to_string()))
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    user_id: i64,
    email: String,
    amount: f64,
    currency: String,
    created_at: chrono::DateTime<chrono::Utc>,
    changed_at: chrono::DateTime<chrono::Utc>,
    transaction_status: String,
}

impl TransactionRow {
    fn into_domain(self) -> StoreResult<Transaction> {
        Ok(Transaction {
            status: parse_status(&self.transaction_status)?,
            id: self.id,
            user_id: self.user_id,
            email: self.email,
            amount: self.amount,
            currency: self.currency,
            created_at: self.created_at,
            changed_at: self.changed_at,
        })
    }
}
