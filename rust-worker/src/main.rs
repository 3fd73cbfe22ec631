//! GuildBot Web Server - Discord interactions endpoint.
//!
//! This binary provides a small web server that:
//! - Receives interaction webhooks from Discord
//! - Verifies the Ed25519 request signature
//! - Answers pings and dispatches slash commands
//!
//! Configuration and the command registry are validated before the listener is
//! bound; any problem there stops the process.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::info;

use guildbot::util::init_logging;
use guildbot::web::{router, AppState};
use guildbot::{CommandRegistry, Config, Verifier};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("web_server_starting");

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;
    info!(
        port = config.port,
        application_id = %config.application_id,
        guild_id = %config.guild_id,
        "config_loaded"
    );

    let verifier = Verifier::from_hex(&config.public_key).context("Invalid public key")?;

    let registry = CommandRegistry::builtin().context("Invalid command registry")?;
    info!(commands = ?registry.names(), "command_registry_built");

    let port = config.port;
    let app = router(AppState::new(config, verifier, registry));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl_c_handler_failed");
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
                tracing::error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
