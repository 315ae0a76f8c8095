use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use car_service_api::{
    build_app,
    config::{Config, StoreBackend},
    constants::API_NAME,
    repository::{CarRepository, InMemoryCarRepository, PgCarRepository},
    service::CarService,
};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("{} Starting Car Service API on port {}", API_NAME, config.server_port);

    let repository = connect_store(&config).await?;
    let app = build_app(CarService::new(repository));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("{} Server listening on {}", API_NAME, addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("{} Server stopped", API_NAME);
    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn CarRepository>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("{} Using in-memory store; records are lost on shutdown", API_NAME);
            Ok(Arc::new(InMemoryCarRepository::new()))
        }
        StoreBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("{} Connected to database", API_NAME);

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            tracing::info!("{} Database migrations completed", API_NAME);

            Ok(Arc::new(PgCarRepository::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("{} Failed to listen for Ctrl-C: {}", API_NAME, e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("{} Failed to listen for SIGTERM: {}", API_NAME, e);
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

    tracing::info!("{} Shutdown signal received", API_NAME);
}
