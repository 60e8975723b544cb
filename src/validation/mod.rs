use serde::Deserialize;
use std::fmt;

use crate::domain::{TransactionDraft, TransactionStatus};
use crate::error::AppError;

pub const EMAIL_MAX_LEN: usize = 50;
pub const CURRENCY_MAX_LEN: usize = 20;

/// Targets a client may request through the status-change route.
pub const CLIENT_SETTABLE_STATUSES: &[TransactionStatus] =
    &[TransactionStatus::Success, TransactionStatus::Failure];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

/// Length limit counted in characters, not bytes.
pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Body of `POST /transaction`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransactionRequest {
    pub user_id: Option<i64>,
    pub email: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl CreateTransactionRequest {
    pub fn validate(self) -> Result<TransactionDraft, ValidationError> {
        let user_id = self
            .user_id
            .filter(|id| *id != 0)
            .ok_or_else(|| ValidationError::new("user_id", "is required and must be non-zero"))?;

        let email = self.email.unwrap_or_default();
        validate_required("email", &email)?;
        validate_max_len("email", &email, EMAIL_MAX_LEN)?;

        let amount = self
            .amount
            .filter(|amount| *amount != 0.0 && amount.is_finite())
            .ok_or_else(|| ValidationError::new("amount", "is required and must be non-zero"))?;

        let currency = self.currency.unwrap_or_default();
        validate_required("currency", &currency)?;
        validate_max_len("currency", &currency, CURRENCY_MAX_LEN)?;

        Ok(TransactionDraft {
            user_id,
            email,
            amount,
            currency,
        })
    }
}

/// Body of `PUT /transaction`.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeStatusRequest {
    pub id: Option<i64>,
    pub transaction_status: Option<String>,
}

impl ChangeStatusRequest {
    pub fn validate(self) -> Result<(i64, TransactionStatus), ValidationError> {
        let id = self
            .id
            .filter(|id| *id != 0)
            .ok_or_else(|| ValidationError::new("id", "is required and must be non-zero"))?;

        let raw = self.transaction_status.unwrap_or_default();
        validate_required("transaction_status", &raw)?;

        let target = raw
            .parse::<TransactionStatus>()
            .ok()
            .filter(|status| CLIENT_SETTABLE_STATUSES.contains(status))
            .ok_or_else(|| {
                ValidationError::new(
                    "transaction_status",
                    format!("can't change transaction status to '{}'", raw),
                )
            })?;

        Ok((id, target))
    }
}

/// Parses a JSON body, mapping any decode failure to a 400.
pub fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("invalid JSON body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(json: &str) -> Result<TransactionDraft, AppError> {
        Ok(parse_json::<CreateTransactionRequest>(json.as_bytes())?.validate()?)
    }

    fn change(json: &str) -> Result<(i64, TransactionStatus), AppError> {
        Ok(parse_json::<ChangeStatusRequest>(json.as_bytes())?.validate()?)
    }

    #[test]
    fn validates_required_field() {
        assert!(validate_required("field", "value").is_ok());
        assert!(validate_required("field", "   ").is_err());
    }

    #[test]
    fn max_len_counts_characters() {
        assert!(validate_max_len("field", "abc", 3).is_ok());
        assert!(validate_max_len("field", "abcd", 3).is_err());
        assert!(validate_max_len("field", "ééé", 3).is_ok());
    }

    #[test]
    fn accepts_valid_create_body() {
        let draft =
            create(r#"{"user_id":1,"email":"a@b.com","amount":1.5,"currency":"USD"}"#).unwrap();

        assert_eq!(draft.user_id, 1);
        assert_eq!(draft.email, "a@b.com");
        assert_eq!(draft.amount, 1.5);
        assert_eq!(draft.currency, "USD");
    }

    #[test]
    fn rejects_invalid_create_bodies() {
        let long_email = format!(
            r#"{{"user_id":1,"email":"{}","amount":1.5,"currency":"USD"}}"#,
            "a".repeat(51)
        );
        let long_currency = format!(
            r#"{{"user_id":1,"email":"a@b.com","amount":1.5,"currency":"{}"}}"#,
            "a".repeat(21)
        );
        let cases = [
            r#"{"user_id":1,"email":"a@b.com","amount":1.5}"#.to_string(),
            r#"{"user_id":0,"email":"a@b.com","amount":1.5,"currency":"USD"}"#.to_string(),
            r#"{"user_id":1,"email":"","amount":1.5,"currency":"USD"}"#.to_string(),
            r#"{"user_id":1,"email":"a@b.com","amount":0,"currency":"USD"}"#.to_string(),
            r#"{"user_id":"1","email":"a@b.com","amount":1.5,"currency":"USD"}"#.to_string(),
            "no]/:fie;OeFM".to_string(),
            long_email,
            long_currency,
        ];

        for body in cases {
            assert!(
                matches!(create(&body), Err(AppError::BadRequest(_))),
                "expected 400 for {body}"
            );
        }
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let body = format!(
            r#"{{"user_id":1,"email":"{}","amount":-3,"currency":"{}"}}"#,
            "a".repeat(50),
            "b".repeat(20)
        );
        assert!(create(&body).is_ok());
    }

    #[test]
    fn accepts_client_settable_targets() {
        assert_eq!(
            change(r#"{"id":1,"transaction_status":"SUCCESS"}"#).unwrap(),
            (1, TransactionStatus::Success)
        );
        assert_eq!(
            change(r#"{"id":2,"transaction_status":"FAILURE"}"#).unwrap(),
            (2, TransactionStatus::Failure)
        );
    }

    #[test]
    fn rejects_other_targets() {
        for status in ["NEW", "ERROR", "CANCELLED", "success", "DONE"] {
            let body = format!(r#"{{"id":1,"transaction_status":"{status}"}}"#);
            assert!(matches!(change(&body), Err(AppError::BadRequest(_))), "{status}");
        }
    }

    #[test]
    fn rejects_missing_change_fields() {
        assert!(change(r#"{"transaction_status":"FAILURE"}"#).is_err());
        assert!(change(r#"{"id":1}"#).is_err());
        assert!(change("BadIn*p|ut").is_err());
    }
}
