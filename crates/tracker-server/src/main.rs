//! Tracker Server
//!
//! Personal tracking site: weight, calorie and photo charts by month, a daily
//! weight guess, and admin pages to add users and record weights.
//!
//! Records live in Upstash Redis when it is configured, in memory otherwise.

mod app;
mod extractors;
mod forms;
mod handlers;
mod security;
mod services;
mod settings;
mod storage;
mod views;

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use settings::{Args, Settings};
use services::{AuthService, ChartCatalog};
use storage::Storage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub auth_service: Arc<AuthService>,
    pub charts: Arc<ChartCatalog>,
    pub settings: Arc<Settings>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tracker_server=info,tower_http=info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let args = Args::parse();

    info!("Starting Tracker Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server(args).await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server(args: Args) -> Result<()> {
    info!("Loading configuration...");
    let settings = Settings::load(&args).context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, static={}, local={}",
        settings.bind_address,
        settings.static_dir.display(),
        settings.local_mode
    );

    info!("Initializing storage...");
    let storage = Arc::new(Storage::from_config(&settings.storage));
    info!("Storage initialized: {}", storage.status().storage_type);

    let auth_service = Arc::new(AuthService::new(
        storage.clone(),
        settings.secret_key.clone(),
    ));
    let charts = Arc::new(ChartCatalog::new(&settings.static_dir));

    let addr: SocketAddr = settings
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let state = AppState {
        storage,
        auth_service,
        charts,
        settings: Arc::new(settings),
    };

    let app = app::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
