use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use apoxer_api::{
    app,
    config::Config,
    middleware::auth::JwtVerifier,
    rewards::{
        HttpRewardsDispatcher, LogRewardsDispatcher, RewardsDispatcher, worker::RewardsWorker,
    },
    state::AppState,
};
use storage::Database;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Apoxer tournament API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::with_max_connections(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let jwt = JwtVerifier::new(&config.jwt_secret, config.jwt_audience.as_deref());

    let dispatcher: Arc<dyn RewardsDispatcher> = match &config.rewards_webhook_url {
        Some(url) => {
            tracing::info!("Rewards will be posted to {}", url);
            Arc::new(HttpRewardsDispatcher::new(url.clone()))
        }
        None => {
            tracing::warn!("REWARDS_WEBHOOK_URL not set, rewards will only be logged");
            Arc::new(LogRewardsDispatcher)
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = RewardsWorker::new(
        db.clone(),
        dispatcher,
        Duration::from_secs(config.rewards_poll_interval_secs.max(1)),
        config.rewards_max_attempts,
    );
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    axum::serve(listener, app(AppState { db, jwt }))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped, waiting for rewards worker");
    shutdown_tx.send(true).ok();
    worker_handle.await.ok();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
