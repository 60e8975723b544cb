#![allow(dead_code)]

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, TimeZone, Utc};
use tower::ServiceExt;

use paymulator_core::adapters::InMemoryTransactionStore;
use paymulator_core::config::RateLimitConfig;
use paymulator_core::domain::{Transaction, TransactionStatus};
use paymulator_core::middleware::{Credentials, RateLimiter};
use paymulator_core::ports::TransactionStore;
use paymulator_core::{create_app, AppState};

pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";

pub fn record(id: i64, user_id: i64, email: &str, amount: f64, status: TransactionStatus) -> Transaction {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::minutes(id);
    Transaction {
        id,
        user_id,
        email: email.to_string(),
        amount,
        currency: "USD".to_string(),
        created_at: created,
        changed_at: created,
        status,
    }
}

/// User 1 owns transactions 1 (1.2, NEW) and 2 (11.2, ERROR).
pub fn seeded_store() -> Arc<InMemoryTransactionStore> {
    Arc::new(InMemoryTransactionStore::with_records(vec![
        record(1, 1, "example@mail.com", 1.2, TransactionStatus::New),
        record(2, 1, "example@mail.com", 11.2, TransactionStatus::Error),
        record(3, 2, "other@mail.com", 5.0, TransactionStatus::Success),
        record(4, 2, "other@mail.com", 7.0, TransactionStatus::Cancelled),
    ]))
}

pub fn limiter(per_second: u32, burst: u32) -> RateLimiter {
    RateLimiter::new(&RateLimitConfig::new(
        NonZeroU32::new(per_second).unwrap(),
        NonZeroU32::new(burst).unwrap(),
    ))
}

pub fn app_with(store: Arc<dyn TransactionStore>, limiter: RateLimiter) -> Router {
    create_app(AppState::new(
        store,
        limiter,
        Credentials::new(USERNAME, PASSWORD),
    ))
}

/// App over the seeded store with a limiter large enough to stay out of the way.
pub fn test_app() -> Router {
    app_with(seeded_store(), limiter(1000, 1000))
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

pub fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap()
}

pub fn authed(method: &str, uri: &str, body: &str, username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, basic(username, password))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.unwrap()
}

pub async fn status_of(app: &Router, req: Request<Body>) -> StatusCode {
    send(app, req).await.status()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
