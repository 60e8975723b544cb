pub mod auth;
pub mod rate_limit;
pub mod request_logger;

pub use auth::{basic_auth, Credentials};
pub use rate_limit::{rate_limit, RateLimiter};
pub use request_logger::request_logger_middleware;
