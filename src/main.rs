//! Check-in Server
//!
//! REST API server for visitor QR check-in.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkin_server::{api, config::AppConfig, repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("checkin_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Check-in Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let repository = repository::connect(&config.database)
        .await
        .context("Failed to connect to visitor store")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&repository.pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let services = Services::new(Arc::new(repository), &config);

    // Startup probe; a failure is logged and the server still starts
    let health = services.health.check().await;
    if health.is_healthy {
        tracing::info!("Visitor store reachable, all tables accessible");
    } else {
        tracing::error!(
            "Visitor store not reachable at startup: {}",
            health.error.as_deref().unwrap_or("unknown error")
        );
    }

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
