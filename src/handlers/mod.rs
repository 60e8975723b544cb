pub mod transactions;

pub use transactions::{
    cancel_transaction, change_transaction_status, create_transaction, get_transaction_status,
    list_transactions,
};
