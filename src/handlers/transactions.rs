use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Transaction, TransactionStatus};
use crate::error::AppError;
use crate::utils::pagination::{paginate, PAGE_SIZE};
use crate::utils::sorting::{sort_transactions, SortKey, SortOrder};
use crate::validation::{parse_json, ChangeStatusRequest, CreateTransactionRequest};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub id: i64,
    pub transaction_status: TransactionStatus,
}

fn parse_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::BadRequest("id must be an integer".to_string()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_or_default<T>(value: Option<String>) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match non_empty(value) {
        Some(raw) => raw.parse().map_err(AppError::BadRequest),
        None => Ok(T::default()),
    }
}

/// `GET /transactions/:id`
pub async fn get_transaction_status(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(path)?;
    let status = state.engine.lookup(id).await?;

    Ok((
        StatusCode::FOUND,
        Json(StatusResponse {
            id,
            transaction_status: status,
        }),
    ))
}

/// `GET /transactions?user_id=|email=&sort=&order=&page=`
pub async fn list_transactions(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let key: SortKey = parse_or_default(params.sort)?;
    let order: SortOrder = parse_or_default(params.order)?;
    let page = match non_empty(params.page) {
        Some(raw) => raw.parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!("page should be integer, got '{raw}'"))
        })?,
        None => 0,
    };

    let mut transactions: Vec<Transaction> =
        match (non_empty(params.user_id), non_empty(params.email)) {
            (Some(raw), None) => {
                let user_id = raw
                    .parse::<i64>()
                    .map_err(|_| AppError::BadRequest("'user_id' is NaN".to_string()))?;
                state.store.list_by_user(user_id).await?
            }
            (None, Some(email)) => state.store.list_by_email(&email).await?,
            (Some(_), Some(_)) => {
                return Err(AppError::BadRequest(
                    "provide either 'user_id' or 'email', not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::BadRequest(
                    "no 'user_id' or 'email' provided".to_string(),
                ))
            }
        };

    sort_transactions(&mut transactions, key, order);
    let (start, end) = paginate(page, PAGE_SIZE, transactions.len());
    let window: Vec<Transaction> = transactions.drain(start..end).collect();

    Ok((StatusCode::FOUND, Json(window)))
}

/// `POST /transaction`
pub async fn create_transaction(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let draft = parse_json::<CreateTransactionRequest>(&body)?.validate()?;
    let created = state.engine.create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Added new Transaction",
            "id": created.id,
            "transaction_status": created.status,
        })),
    ))
}

/// `PUT /transaction`, behind basic auth.
pub async fn change_transaction_status(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let (id, target) = parse_json::<ChangeStatusRequest>(&body)?.validate()?;
    state.engine.change_status(id, target).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": format!("Success! Status changed to {target}"),
            "id": id,
        })),
    ))
}

/// `PUT /transaction/:id`
pub async fn cancel_transaction(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(path)?;
    state
        .engine
        .change_status(id, TransactionStatus::Cancelled)
        .await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Success! Transaction cancelled",
            "id": id,
        })),
    ))
}
