pub mod transactions;

use crate::health::check_health;
use crate::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use utoipa::OpenApi;

use crate::schemas::TransactionDto;

#[derive(OpenApi)]
#[openapi(
    paths(
        transactions::create_transaction,
        transactions::list_transactions,
        transactions::list_account_transactions,
        transactions::get_transaction,
        transactions::update_transaction_status,
    ),
    components(schemas(TransactionDto)),
    tags((name = "Transactions", description = "Ledger transaction records and status transitions"))
)]
pub struct ApiDoc;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = check_health(state.store_checker.clone(), state.start_time).await;

    // 503 lets load balancers drop the instance while the store is down
    let status_code = if response.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
