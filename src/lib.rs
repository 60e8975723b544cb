pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod ports;
pub mod utils;
pub mod validation;

use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put, MethodRouter},
    Router,
};

use crate::domain::StatusEngine;
use crate::middleware::{
    basic_auth, rate_limit, request_logger_middleware, Credentials, RateLimiter,
};
use crate::ports::TransactionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub engine: StatusEngine,
    pub rate_limiter: Arc<RateLimiter>,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        rate_limiter: RateLimiter,
        credentials: Credentials,
    ) -> Self {
        Self {
            engine: StatusEngine::new(Arc::clone(&store)),
            store,
            rate_limiter: Arc::new(rate_limiter),
            credentials: Arc::new(credentials),
        }
    }
}

/// Builds the router. Every route runs, outermost first:
/// request logging, rate limiting, basic auth (status change only), then the
/// handler, whose `AppError` is translated into the response.
pub fn create_app(state: AppState) -> Router {
    let change_status: MethodRouter<AppState> = put(handlers::change_transaction_status)
        .route_layer(from_fn_with_state(
            Arc::clone(&state.credentials),
            basic_auth,
        ));

    Router::new()
        .route("/transactions/:id", get(handlers::get_transaction_status))
        .route("/transactions", get(handlers::list_transactions))
        .route(
            "/transaction",
            post(handlers::create_transaction).merge(change_status),
        )
        .route("/transaction/:id", put(handlers::cancel_transaction))
        .layer(from_fn_with_state(Arc::clone(&state.rate_limiter), rate_limit))
        .layer(from_fn(request_logger_middleware))
        .with_state(state)
}
