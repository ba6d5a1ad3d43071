//! oracled - Generator Oracle Server Daemon
//!
//! Serves fault code search and reset procedure lookup over HTTP.
//!
//! Usage:
//!   oracled [OPTIONS]
//!
//! Without a config file the daemon listens on port 18090 and serves the
//! builtin sample catalog.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use oracle_api::{create_router, AppState};
use oracle_data::SharedCatalog;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "oracled")]
#[command(author, version, about = "Generator Oracle fault code server")]
struct Args {
    /// Server config file (TOML)
    #[arg(short, long, env = "ORACLED_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Catalog file or directory (.yaml/.yml/.json); can be repeated
    #[arg(short, long = "data", value_name = "PATH")]
    data: Vec<PathBuf>,

    /// Do not load the builtin sample catalog
    #[arg(long)]
    no_builtin: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "oracled=info,oracle_api=info,oracle_data=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json);

    tracing::info!("Starting oracled (Generator Oracle Server Daemon)");

    let config = match args.config {
        Some(ref path) => {
            tracing::info!("Loading config from: {}", path.display());
            Config::load_from(path)?
        }
        None => {
            tracing::info!("No config file provided, using defaults");
            Config::default()
        }
    }
    .merge_with_args(args.port, &args.data, args.no_builtin);

    // Load eagerly so a bad catalog stops the daemon before it binds
    let catalog = Arc::new(SharedCatalog::new(config.catalog_source()));
    let loaded = catalog.get().await.context("Failed to load catalog")?;
    tracing::info!(
        name = loaded.meta().name.as_deref().unwrap_or("unnamed"),
        fault_codes = loaded.faults().len(),
        reset_procedures = loaded.resets().len(),
        brands = loaded.faults().brands().len(),
        "Catalog ready"
    );

    let state = AppState::new(catalog).with_limits(config.search_limits());
    let app = create_router(state);

    let addr = config.listen_addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
