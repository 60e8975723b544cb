//! Process-wide token bucket used for admission control.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorLimiter,
};

use crate::config::RateLimitConfig;
use crate::error::AppError;

type DirectLimiter<C> =
    GovernorLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// A single bucket shared by every route: `burst` tokens of capacity, refilled
/// at `per_second` tokens per second. Not partitioned per client.
pub struct RateLimiter<C: Clock = DefaultClock> {
    inner: DirectLimiter<C>,
}

impl RateLimiter<DefaultClock> {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self::with_clock(config, &DefaultClock::default())
    }
}

impl<C: Clock> RateLimiter<C> {
    pub fn with_clock(config: &RateLimitConfig, clock: &C) -> Self {
        let quota = Quota::per_second(config.per_second).allow_burst(config.burst);
        Self {
            inner: GovernorLimiter::direct_with_clock(quota, clock),
        }
    }

    /// Takes one token if available. Never waits.
    pub fn allow(&self) -> bool {
        self.inner.check().is_ok()
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !limiter.allow() {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "rate limit exceeded"
        );
        return Err(AppError::TooManyRequests);
    }

    Ok(next.run(req).await)
}
