pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod mapper;
pub mod middleware;
pub mod ports;
pub mod schemas;
pub mod services;
pub mod utils;
pub mod validation;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::health::DependencyChecker;
use crate::middleware::RequestLogging;
use crate::services::TransactionService;

#[derive(Clone)]
pub struct AppState {
    pub transactions: TransactionService,
    pub store_checker: Arc<dyn DependencyChecker>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(transactions: TransactionService, store_checker: Arc<dyn DependencyChecker>) -> Self {
        Self {
            transactions,
            store_checker,
            start_time: Instant::now(),
        }
    }
}

/// HTTP-level settings that do not belong to the service state.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    pub log_request_body: bool,
    pub cors_allowed_origins: Vec<String>,
}

pub fn create_app(state: AppState) -> Router {
    create_app_with(state, HttpSettings::default())
}

pub fn create_app_with(state: AppState, settings: HttpSettings) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/transactions",
            get(handlers::transactions::list_transactions)
                .post(handlers::transactions::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::transactions::get_transaction),
        )
        .route(
            "/transactions/:id/status",
            patch(handlers::transactions::update_transaction_status),
        )
        .route(
            "/accounts/:account_number/transactions",
            get(handlers::transactions::list_account_transactions),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", handlers::ApiDoc::openapi()))
        .with_state(state)
        .layer(axum::middleware::from_fn_with_state(
            RequestLogging {
                log_body: settings.log_request_body,
            },
            middleware::request_logger_middleware,
        ));

    match cors_layer(&settings.cors_allowed_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers(Any),
    )
}
