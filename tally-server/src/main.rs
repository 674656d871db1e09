//! tally-server - service desk tally reporting API
//!
//! Startup order:
//! 1. Parse CLI/environment, load the optional TOML file
//! 2. Initialize tracing and log build identification
//! 3. Open the store, ensure schema, seed default menus
//! 4. Serve HTTP until Ctrl+C / SIGTERM

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tally_common::config::{Config, Overrides, TomlConfig};
use tally_common::db::{initialize_store, StoreOptions};
use tally_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for tally-server
#[derive(Parser, Debug)]
#[command(name = "tally-server")]
#[command(about = "Service desk tally reporting API")]
#[command(version)]
struct Args {
    /// Folder holding tally.db
    #[arg(short, long, env = "TALLY_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "TALLY_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "TALLY_HOST")]
    host: Option<String>,

    /// TOML config file (defaults to the platform config directory)
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// Reject tallies submitted without a timestamp
    #[arg(long, env = "TALLY_REQUIRE_TIMESTAMP")]
    require_timestamp: Option<bool>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            root_folder: self.root_folder.clone(),
            host: self.host.clone(),
            port: self.port,
            require_timestamp: self.require_timestamp,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (file_config, config_warning) = TomlConfig::load_or_default(args.config.as_deref());
    let config = Config::resolve(args.overrides(), file_config);

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tally-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    std::panic::set_hook(Box::new(|panic_info| {
        error!("PANIC: {}", panic_info);
    }));

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let options = StoreOptions {
        max_connections: config.max_connections,
        ..StoreOptions::default()
    };
    let pool = initialize_store(&db_path, &options)
        .await
        .context("Failed to open tally store")?;

    let state = AppState::new(pool.clone(), config.require_timestamp);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("tally-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
