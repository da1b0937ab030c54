mod config;
mod handlers;
mod models;
mod templates;
mod update;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{UpdateSettings, DEFAULT_ELEVATE_WITH, DEFAULT_SCRIPT_PATH};
use handlers::AppState;
use update::UpdateRunner;

#[derive(Parser, Debug)]
#[command(name = "server-status")]
#[command(about = "Server status dashboard and system update service", long_about = None)]
struct Args {
    /// Host pro HTTP server
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port pro HTTP server
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Cesta k update skriptu
    #[arg(long, env = "UPDATE_SCRIPT", default_value = DEFAULT_SCRIPT_PATH)]
    script: PathBuf,

    /// Program pro spuštění skriptu se zvýšenými oprávněními
    #[arg(long, env = "UPDATE_ELEVATE_WITH", default_value = DEFAULT_ELEVATE_WITH)]
    elevate_with: String,

    /// Spouštět skript přímo, bez zvýšení oprávnění
    #[arg(long, env = "UPDATE_NO_ELEVATE")]
    no_elevate: bool,

    /// Timeout updatu v sekundách (bez hodnoty = bez timeoutu)
    #[arg(long, env = "UPDATE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializuj logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server_status=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI argumenty
    let args = Args::parse();

    tracing::info!("Starting server status service...");

    let settings = UpdateSettings::new(
        args.script,
        args.elevate_with,
        args.no_elevate,
        args.timeout_secs,
    );
    let runner = UpdateRunner::new(settings);
    runner.settings().log_warnings();
    tracing::info!("Update command: {}", runner.settings().command_line());

    // Shared state
    let state = Arc::new(AppState::new(runner));
    let app = handlers::router(state);

    // Adresa serveru
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
