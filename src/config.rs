use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{anyhow, Context};
use dotenvy::dotenv;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DB_RETRY_INTERVAL_SECS: u64 = 5;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_RATE_LIMIT_PER_SECOND: u32 = 10;
const DEFAULT_RATE_LIMIT_BURST: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub per_second: NonZeroU32,
    pub burst: NonZeroU32,
}

impl RateLimitConfig {
    pub fn new(per_second: NonZeroU32, burst: NonZeroU32) -> Self {
        Self { per_second, burst }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_second: NonZeroU32::MIN.saturating_add(DEFAULT_RATE_LIMIT_PER_SECOND - 1),
            burst: NonZeroU32::MIN.saturating_add(DEFAULT_RATE_LIMIT_BURST - 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_connect_timeout: Duration,
    pub db_retry_interval: Duration,
    pub db_max_connections: u32,
    pub auth_username: String,
    pub auth_password: String,
    pub rate_limit: RateLimitConfig,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&lookup)?,
        };

        let auth_username = required(&lookup, "PAYMENT_SYSTEM_USERNAME")?;
        let auth_password = required(&lookup, "PAYMENT_SYSTEM_PASSWORD")?;

        Ok(Config {
            server_port: parse_or(&lookup, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            database_url,
            db_connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            )?),
            db_retry_interval: Duration::from_secs(parse_or(
                &lookup,
                "DB_RETRY_INTERVAL_SECS",
                DEFAULT_DB_RETRY_INTERVAL_SECS,
            )?),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            auth_username,
            auth_password,
            rate_limit: RateLimitConfig {
                per_second: parse_or(
                    &lookup,
                    "RATE_LIMIT_PER_SECOND",
                    RateLimitConfig::default().per_second,
                )?,
                burst: parse_or(&lookup, "RATE_LIMIT_BURST", RateLimitConfig::default().burst)?,
            },
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        })
    }

    /// Database URL with the password replaced, for logs.
    pub fn redacted_database_url(&self) -> String {
        redact_url_password(&self.database_url)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("database_url", &self.redacted_database_url())
            .field("db_connect_timeout", &self.db_connect_timeout)
            .field("db_retry_interval", &self.db_retry_interval)
            .field("db_max_connections", &self.db_max_connections)
            .field("auth_username", &self.auth_username)
            .field("auth_password", &"***")
            .field("rate_limit", &self.rate_limit)
            .field("log_format", &self.log_format)
            .finish()
    }
}

fn required<F>(lookup: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| anyhow!("{key} must be set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: '{raw}'")),
        None => Ok(default),
    }
}

fn database_url_from_parts<F>(lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("DB_HOST")
        .ok_or_else(|| anyhow!("DATABASE_URL or DB_HOST must be set"))?;
    let part = |key: &str| lookup(key).unwrap_or_default();

    Ok(format!(
        "postgresql://{}:{}@{}:{}/{}?connect_timeout=5",
        part("DB_USERNAME"),
        part("DB_PASSWORD"),
        host,
        lookup("DB_PORT").unwrap_or_else(|| "5432".to_string()),
        part("DB_NAME"),
    ))
}

fn redact_url_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.split_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
        None => url.to_string(),
    }
}
