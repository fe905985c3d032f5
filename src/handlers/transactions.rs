use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::AppError;
use crate::schemas::{StatusUpdateQuery, TransactionDto, TransactionFilter};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/transactions",
    request_body = TransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionDto),
        (status = 400, description = "Invalid transaction")
    ),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<TransactionDto>,
) -> Result<impl IntoResponse, AppError> {
    let request = payload.validate_for_create()?;
    let created = state.transactions.create(request).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/transactions",
    params(TransactionFilter),
    responses(
        (status = 200, description = "Matching transactions", body = [TransactionDto]),
        (status = 400, description = "Unknown status filter")
    ),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<TransactionDto>>, AppError> {
    let transactions = match (filter.account_number.as_deref(), filter.status.as_deref()) {
        (Some(account_number), _) => state.transactions.get_by_account(account_number).await?,
        (None, Some(status)) => state.transactions.get_by_status(status).await?,
        (None, None) => state.transactions.get_all().await?,
    };

    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/accounts/{account_number}/transactions",
    params(("account_number" = String, Path, description = "Account number")),
    responses(
        (status = 200, description = "Transactions of the account", body = [TransactionDto])
    ),
    tag = "Transactions"
)]
pub async fn list_account_transactions(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
) -> Result<Json<Vec<TransactionDto>>, AppError> {
    Ok(Json(state.transactions.get_by_account(&account_number).await?))
}

#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = i64, Path, description = "Transaction id")),
    responses(
        (status = 200, description = "Transaction found", body = TransactionDto),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Transactions"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionDto>, AppError> {
    state
        .transactions
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))
}

#[utoipa::path(
    patch,
    path = "/transactions/{id}/status",
    params(("id" = i64, Path, description = "Transaction id"), StatusUpdateQuery),
    responses(
        (status = 200, description = "Status updated", body = TransactionDto),
        (status = 400, description = "Unrecognized status"),
        (status = 404, description = "Transaction not found"),
        (status = 409, description = "Transition not allowed from the current status")
    ),
    tag = "Transactions"
)]
pub async fn update_transaction_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<StatusUpdateQuery>,
) -> Result<Json<TransactionDto>, AppError> {
    state
        .transactions
        .update_status(id, &query.status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", id)))
}
