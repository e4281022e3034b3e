//! # Skycast API Server
//!
//! Server entry point: a session-authenticated dashboard aggregating
//! current conditions, forecast, and air quality for a searched city.
//!
//! ## Startup sequence
//!
//! 1. Tracing
//! 2. Configuration (fails fast on missing secrets)
//! 3. Database pool (file created on first run) + migrations
//! 4. Expired-session sweep
//! 5. Router + listener, served until ctrl-c

use skycast_api::{
    app::{build_router, AppState},
    config::Config,
};
use skycast_shared::db::{
    migrations::run_migrations,
    pool::{create_pool, DatabaseConfig},
};
use skycast_shared::models::session::Session;
use skycast_shared::weather::OpenWeatherClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skycast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Skycast v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let purged = Session::purge_expired(&pool).await?;
    if purged > 0 {
        tracing::info!(purged, "Removed expired sessions");
    }

    let weather = Arc::new(OpenWeatherClient::new(config.weather.api_key.clone())?);

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, weather);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, exiting...");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
