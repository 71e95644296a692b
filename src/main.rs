// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise Tracker API Server

use exercise_tracker::{
    clock::SystemClock,
    config::{Config, LogFormat, StoreBackend},
    db::{FirestoreStore, InMemoryStore, UserStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_logging(
        config
            .as_ref()
            .map(|c| c.log_format)
            .unwrap_or(LogFormat::Json),
    )?;

    let config = config.inspect_err(|e| tracing::error!(error = %e, "Invalid configuration"))?;
    tracing::info!(
        port = config.port,
        backend = ?config.store_backend,
        "Starting Exercise Tracker API"
    );

    let store: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::Firestore => {
            let project_id = config.gcp_project_id.as_deref().unwrap_or_default();
            Arc::new(FirestoreStore::new(project_id).await?)
        }
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        clock: Arc::new(SystemClock),
    });

    let app = exercise_tracker::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Initialize structured logging. JSON unless `LOG_FORMAT=text`.
fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("exercise_tracker=debug".parse()?)
        .add_directive("info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init()?,
    }
    Ok(())
}
