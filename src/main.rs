//! owner-label-webhook - A Kubernetes ValidatingAdmissionWebhook.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Parses configuration and selects HTTPS or plain HTTP
//! - Runs the webhook server until SIGTERM or SIGINT

use clap::Parser;
use tokio::signal;
use tracing::info;

use owner_label_webhook::{Config, ValidationEngine, run_webhook_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("owner_label_webhook=info".parse()?),
        )
        .json()
        .init();

    let config = Config::parse();
    info!(version = env!("CARGO_PKG_VERSION"), "Starting owner-label-webhook");

    let engine = ValidationEngine::default();
    info!(predicates = ?engine.predicate_names(), "Validation engine ready");

    let mode = config.transport();
    if mode.is_tls() {
        info!(addr = %mode.addr(), "TLS certificates found, serving HTTPS");
    } else {
        info!(addr = %mode.addr(), "TLS certificates not found, serving plain HTTP");
    }

    run_webhook_server(mode, engine, shutdown_signal()).await?;

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them. Using expect() here is intentional.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal, initiating graceful shutdown...");
}
