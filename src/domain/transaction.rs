//! Transaction domain entity.
//! Framework-agnostic representation of a payment transaction and its status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    New,
    Error,
    Success,
    Failure,
    Cancelled,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::New,
        TransactionStatus::Error,
        TransactionStatus::Success,
        TransactionStatus::Failure,
        TransactionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::New => "NEW",
            TransactionStatus::Error => "ERROR",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failure => "FAILURE",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }

    /// Finalized outcomes. CANCELLED is handled separately by the status engine.
    pub fn is_final(&self) -> bool {
        matches!(self, TransactionStatus::Success | TransactionStatus::Failure)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transaction status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TransactionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Domain entity representing a stored transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub amount: f64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub changed_at: DateTime<Utc>,
    #[serde(rename = "transaction_status")]
    pub status: TransactionStatus,
}

/// Client-supplied fields of a transaction, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub user_id: i64,
    pub email: String,
    pub amount: f64,
    pub currency: String,
}

impl TransactionDraft {
    pub fn with_status(self, status: TransactionStatus) -> NewTransaction {
        NewTransaction {
            user_id: self.user_id,
            email: self.email,
            amount: self.amount,
            currency: self.currency,
            status,
        }
    }
}

/// A record ready to be persisted; the store assigns the ID and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: i64,
    pub email: String,
    pub amount: f64,
    pub currency: String,
    pub status: TransactionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_parse_back() {
        for status in TransactionStatus::ALL {
            assert_eq!(status.as_str().parse::<TransactionStatus>(), Ok(status));
        }
    }

    #[test]
    fn lowercase_label_is_rejected() {
        assert!("success".parse::<TransactionStatus>().is_err());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let now = Utc::now();
        let tx = Transaction {
            id: 7,
            user_id: 1,
            email: "a@b.com".to_string(),
            amount: 1.5,
            currency: "USD".to_string(),
            created_at: now,
            changed_at: now,
            status: TransactionStatus::Cancelled,
        };

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["transaction_status"], "CANCELLED");
        assert_eq!(value["user_id"], 1);
        assert!(value.get("status").is_none());
    }
}
