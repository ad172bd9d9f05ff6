//! Stagedoor Server — application entry point and composition root.

mod config;

use anyhow::Context;
use stagedoor_auth::{IdentityService, RequestAuthenticator};
use stagedoor_db::repository::{SurrealIdentityStore, SurrealServiceRepository};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stagedoor=info".parse()?))
        .json()
        .init();

    info!("Starting stagedoor server...");

    let config = ServerConfig::load()?;

    let db = stagedoor_db::connect(&config.db)
        .await
        .context("failed to connect to SurrealDB")?;
    stagedoor_db::run_migrations(&db)
        .await
        .context("failed to run migrations")?;

    // Explicitly constructed handles — no ambient globals. The db
    // handle is internally reference-counted, so each component gets
    // its own clone.
    let _identity_service =
        IdentityService::new(SurrealIdentityStore::new(db.clone()), config.auth.clone());
    let _authenticator =
        RequestAuthenticator::new(SurrealIdentityStore::new(db.clone()), config.auth);
    let _services = SurrealServiceRepository::new(db);

    // TODO: mount the HTTP routing layer on these handles.

    info!("stagedoor server ready");

    shutdown_signal().await;

    info!("stagedoor server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            // Still wait for SIGTERM below.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
