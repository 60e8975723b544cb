pub mod status_engine;
pub mod transaction;

pub use status_engine::{check_transition, initial_status, StatusEngine, TransitionError};
pub use transaction::{
    NewTransaction, Transaction, TransactionDraft, TransactionStatus, UnknownStatus,
};
