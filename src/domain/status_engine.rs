//! Transaction lifecycle state machine.
//!
//! All transition legality lives in [`check_transition`]; both the operator
//! status change and the cancel path go through [`StatusEngine::change_status`].

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;

use crate::domain::{Transaction, TransactionDraft, TransactionStatus};
use crate::error::AppError;
use crate::ports::TransactionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("terminal status cannot be changed")]
    Terminal(TransactionStatus),

    #[error("already cancelled")]
    AlreadyCancelled,

    #[error("unsupported target status")]
    UnsupportedTarget(TransactionStatus),
}

/// Decides whether `current -> target` is a legal transition.
pub fn check_transition(
    current: TransactionStatus,
    target: TransactionStatus,
) -> Result<(), TransitionError> {
    use TransactionStatus::*;

    // Duplicate cancel is reported before the generic terminal rule.
    if current == Cancelled && target == Cancelled {
        return Err(TransitionError::AlreadyCancelled);
    }
    if current.is_final() || current == Cancelled {
        return Err(TransitionError::Terminal(current));
    }
    match target {
        Success | Failure | Cancelled => Ok(()),
        New | Error => Err(TransitionError::UnsupportedTarget(target)),
    }
}

/// Status assigned at creation: NEW or ERROR with equal probability.
///
/// Stands in for an external settlement check; client input has no influence.
pub fn initial_status<R: Rng + ?Sized>(rng: &mut R) -> TransactionStatus {
    if rng.gen_bool(0.5) {
        TransactionStatus::New
    } else {
        TransactionStatus::Error
    }
}

/// Applies lifecycle rules on top of a [`TransactionStore`].
///
/// The read-then-write in [`change_status`](Self::change_status) is not
/// serialized per transaction; two concurrent requests on the same ID may both
/// pass the legality check.
#[derive(Clone)]
pub struct StatusEngine {
    store: Arc<dyn TransactionStore>,
}

impl StatusEngine {
    pub fn new(store: Arc<dyn TransactionStore>) -> Self {
        Self { store }
    }

    pub async fn lookup(&self, id: i64) -> Result<TransactionStatus, AppError> {
        Ok(self.store.get_status(id).await?)
    }

    pub async fn create(&self, draft: TransactionDraft) -> Result<Transaction, AppError> {
        let status = initial_status(&mut rand::thread_rng());
        let created = self.store.create(&draft.with_status(status)).await?;

        tracing::info!(
            transaction_id = created.id,
            user_id = created.user_id,
            status = %created.status,
            "transaction created"
        );
        Ok(created)
    }

    pub async fn change_status(
        &self,
        id: i64,
        target: TransactionStatus,
    ) -> Result<(), AppError> {
        let current = self.store.get_status(id).await?;

        if let Err(rejection) = check_transition(current, target) {
            tracing::info!(
                transaction_id = id,
                current = %current,
                target = %target,
                reason = %rejection,
                "status transition rejected"
            );
            return Err(rejection.into());
        }

        self.store.update_status(id, target).await?;
        tracing::info!(
            transaction_id = id,
            from = %current,
            to = %target,
            "status changed"
        );
        Ok(())
    }
}
