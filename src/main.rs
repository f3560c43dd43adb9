//! microblog server entry point.
//!
//! `microblog serve` (the default) starts the HTTP server;
//! `microblog init-db` creates the entries table and exits.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use microblog::app_state::AppState;
use microblog::config::BlogConfig;
use microblog::persistence::Database;
use microblog::web;

/// Single-author microblog.
#[derive(Debug, Parser)]
#[command(name = "microblog", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, env = "LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Create the entries table if it does not exist.
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = BlogConfig::from_env().context("failed to load configuration")?;
    let database = Database::from_url(&config.database_url)
        .with_context(|| format!("invalid DATABASE_URL {}", config.database_url))?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => {
            database
                .initialize()
                .await
                .context("failed to initialize the database")?;
            tracing::info!(url = %config.database_url, "initialized the database");
        }
        Command::Serve => serve(config, database).await?,
    }

    Ok(())
}

async fn serve(config: BlogConfig, database: Database) -> anyhow::Result<()> {
    tracing::info!(addr = %config.listen_addr, "starting microblog");

    let session = config.session_settings()?;
    let state = AppState::new(database, config.credentials());
    let app = web::build_router(state, &session);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
