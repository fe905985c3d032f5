use clap::Parser;
use ledger_core::adapters::{InMemoryTransactionRepository, PostgresTransactionRepository};
use ledger_core::cli::{self, Cli, Commands, DbCommands, TxCommands};
use ledger_core::config::{Config, LogFormat, StoreBackend};
use ledger_core::health::{DependencyChecker, InMemoryChecker, PostgresChecker};
use ledger_core::mapper::TransactionMapper;
use ledger_core::ports::TransactionRepository;
use ledger_core::services::TransactionService;
use ledger_core::{create_app_with, db, AppState, HttpSettings};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
        Commands::Tx(command) => {
            let (repository, _) = build_store(&config).await?;
            let service = TransactionService::new(
                repository,
                TransactionMapper::new(config.transaction_defaults),
            );
            match command {
                TxCommands::Status { tx_id, status } => {
                    cli::handle_tx_status(&service, tx_id, &status).await
                }
                TxCommands::Show { tx_id } => cli::handle_tx_show(&service, tx_id).await,
            }
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn build_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn TransactionRepository>, Arc<dyn DependencyChecker>)> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let pool = db::create_pool(config).await?;
            db::run_migrations(&pool).await?;
            let repository: Arc<dyn TransactionRepository> =
                Arc::new(PostgresTransactionRepository::new(pool.clone()));
            let checker: Arc<dyn DependencyChecker> = Arc::new(PostgresChecker::new(pool));
            Ok((repository, checker))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            let repository: Arc<dyn TransactionRepository> =
                Arc::new(InMemoryTransactionRepository::new());
            let checker: Arc<dyn DependencyChecker> = Arc::new(InMemoryChecker);
            Ok((repository, checker))
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let (repository, store_checker) = build_store(&config).await?;
    let service = TransactionService::new(
        repository,
        TransactionMapper::new(config.transaction_defaults),
    );
    tracing::info!(
        default_status = %config.transaction_defaults.status,
        "Transaction service initialized"
    );

    let app = create_app_with(
        AppState::new(service, store_checker),
        HttpSettings {
            log_request_body: config.log_request_body,
            cors_allowed_origins: config.cors_allowed_origins.clone(),
        },
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
