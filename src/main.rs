use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fretter_api::config::AppConfig;
use fretter_api::database::{DatabaseManager, PgTabStore, TabRepository};
use fretter_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so local runs pick up PORT, DATABASE_URL and the X509_* pair
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::parse();

    let identity = config
        .certificate_source()?
        .load()
        .await
        .context("failed to load client certificate")?;

    let pool = DatabaseManager::connect(&config.connect_settings(), &identity)
        .await
        .context("failed to init document store")?;

    let store = PgTabStore::new(pool.clone());
    store
        .ensure_collection()
        .await
        .context("failed to prepare tabs collection")?;

    let repository = TabRepository::new(Arc::new(store)).with_timeout(config.store_timeout());
    let app = app(AppState::new(repository));

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(listen_addr = %bind_addr, "Fretter API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited unexpectedly")?;

    pool.close().await;
    info!("document store pool closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
