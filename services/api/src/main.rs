use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod metrics;
mod models;
mod repositories;
mod routes;
mod session;
mod state;
mod validation;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;

use crate::{
    config::{ServerConfig, StorageBackend},
    repositories::InMemoryStore,
    session::SessionSettings,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load()?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level)?)
        .init();

    info!("Starting diet API service");

    let session = SessionSettings {
        ttl_days: config.session_ttl_days,
    };

    let app_state = match config.storage {
        StorageBackend::Postgres => {
            // Initialize database connection pool
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            if config.run_migrations {
                run_migrations(&pool).await?;
            }

            AppState::postgres(pool, session)
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on shutdown");
            AppState::in_memory(InMemoryStore::new(), session)
        }
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Diet API service listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
