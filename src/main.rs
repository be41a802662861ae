//! Library Backend - catalog and member administration server

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use library_backend::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::bootstrap::seed_default_accounts,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Library Backend v{}", env!("CARGO_PKG_VERSION"));

    let repository = if config.database.is_in_memory() {
        tracing::warn!("Using the in-memory store; data is lost on shutdown");
        Repository::in_memory()
    } else {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .min_connections(config.database.min_connections)
            .connect(&config.database.url)
            .await
            .context("Failed to connect to database")?;

        tracing::info!("Connected to database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database migrations completed");

        Repository::new(pool)
    };

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid server host address")?,
        config.server.port,
    );

    let state = AppState::new(config, repository);

    let created = seed_default_accounts(&state.services.users, &state.config.bootstrap)
        .await
        .context("Failed to create default accounts")?;
    if created > 0 {
        tracing::info!("Created {} default account(s)", created);
    }

    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("library_backend={},tower_http=debug", config.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
