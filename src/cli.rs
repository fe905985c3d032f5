use clap::{Parser, Subcommand};

use crate::config::{Config, StoreBackend};
use crate::services::TransactionService;

#[derive(Parser)]
#[command(name = "ledger-core")]
#[command(about = "Ledger Core - transaction records and status transitions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction management commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Apply a status transition (DISPUTED, REVERSED, COMPLETED) to a transaction
    Status {
        /// Transaction id
        #[arg(value_name = "TX_ID")]
        tx_id: i64,

        /// Requested status
        #[arg(value_name = "STATUS")]
        status: String,
    },

    /// Print a transaction as JSON
    Show {
        #[arg(value_name = "TX_ID")]
        tx_id: i64,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_status(
    service: &TransactionService,
    tx_id: i64,
    status: &str,
) -> anyhow::Result<()> {
    match service.update_status(tx_id, status).await? {
        Some(updated) => {
            let new_status = updated.status.unwrap_or_default();
            tracing::info!(transaction_id = tx_id, status = %new_status, "Transaction status updated");
            println!("✓ Transaction {} is now {}", tx_id, new_status);
            Ok(())
        }
        None => {
            tracing::warn!(transaction_id = tx_id, "Transaction not found");
            anyhow::bail!("Transaction {} not found", tx_id)
        }
    }
}

pub async fn handle_tx_show(service: &TransactionService, tx_id: i64) -> anyhow::Result<()> {
    match service.get_by_id(tx_id).await? {
        Some(tx) => {
            println!("{}", serde_json::to_string_pretty(&tx)?);
            Ok(())
        }
        None => anyhow::bail!("Transaction {} not found", tx_id),
    }
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    if config.store_backend == StoreBackend::Memory {
        anyhow::bail!("STORE_BACKEND=memory has no database to migrate");
    }

    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;
    println!("✓ Database migrations completed");

    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Store Backend: {:?}", config.store_backend);
    if config.store_backend == StoreBackend::Postgres {
        println!("  Database URL: {}", mask_password(&config.database_url));
        println!("  Database Max Connections: {}", config.database_max_connections);
    }
    println!("  Log Format: {:?}", config.log_format);
    println!("  Log Request Body: {}", config.log_request_body);
    println!(
        "  Default Transaction Status: {}",
        config.transaction_defaults.status
    );
    println!(
        "  Stamp Transaction Date: {}",
        config.transaction_defaults.stamp_transaction_date
    );
    if !config.cors_allowed_origins.is_empty() {
        println!("  CORS Origins: {}", config.cors_allowed_origins.join(", "));
    }

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
