//! Pulse backend daemon.
//!
//! Wires the crates together: loads settings, opens the store, builds the
//! identity verifier and router, spawns the notification job, and serves
//! until a shutdown signal. On
//! shutdown the cancellation token is cancelled first, so every live
//! WebSocket lifecycle loop exits and deregisters before the process ends.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pulse_server::auth::HttpIdentityVerifier;
use pulse_server::{AppState, build_router};
use pulse_settings::{PulseSettings, load_settings, load_settings_from_path};
use pulse_store::EventStore;

/// Command-line arguments. Flags override the settings file.
#[derive(Debug, Parser)]
#[command(name = "pulsed", version, about = "Pulse event-logging backend")]
struct Args {
    /// Settings file path (default: ~/.pulse/settings.json).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address override.
    #[arg(long)]
    host: Option<String>,

    /// Listen port override.
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database path override.
    #[arg(long)]
    db: Option<PathBuf>,
}

fn init_tracing(settings: &PulseSettings) {
    let filter = std::env::var("PULSE_LOG").unwrap_or_else(|_| settings.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => load_settings().context("loading settings")?,
    };
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(db) = args.db {
        settings.database.path = db.display().to_string();
    }

    init_tracing(&settings);

    let store = {
        let path = PathBuf::from(&settings.database.path);
        tokio::task::spawn_blocking(move || EventStore::open(&path))
            .await
            .context("store open task failed")?
            .with_context(|| format!("opening database at {}", settings.database.path))?
    };

    let verifier = Arc::new(
        HttpIdentityVerifier::from_settings(&settings.auth)
            .context("building identity verifier")?,
    );
    let metrics = pulse_server::metrics::install_recorder();
    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState::new(
        settings.clone(),
        store,
        verifier,
        shutdown.clone(),
        Some(metrics),
    ));

    let _ = tokio::spawn(pulse_server::notifier::run_notifier(Arc::clone(&state)));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, db = %settings.database.path, "pulse backend listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    info!("pulse backend stopped");
    Ok(())
}

/// Resolves when ctrl-c or SIGTERM arrives, after cancelling `token` so
/// every connection lifecycle loop can run its cleanup.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received, closing live connections");
    token.cancel();
}
