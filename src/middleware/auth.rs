use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Expected Basic-auth credentials, kept only as SHA-256 digests.
#[derive(Clone)]
pub struct Credentials {
    username_hash: [u8; 32],
    password_hash: [u8; 32],
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username_hash: digest(username),
            password_hash: digest(password),
        }
    }

    /// Compares both fields in constant time. Both comparisons always run.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_match = digest(username)[..].ct_eq(&self.username_hash[..]);
        let password_match = digest(password)[..].ct_eq(&self.password_hash[..]);
        (username_match & password_match).into()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Extracts `(username, password)` from an `Authorization: Basic ...` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

pub async fn basic_auth(
    State(credentials): State<Arc<Credentials>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let authorized = basic_credentials(req.headers())
        .map(|(username, password)| credentials.verify(&username, &password))
        .unwrap_or(false);

    if !authorized {
        tracing::warn!(
            method = %req.method(),
            path = %req.uri().path(),
            "basic auth failed"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(req).await)
}
