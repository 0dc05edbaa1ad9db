use std::sync::Arc;

use anyhow::Result;
use exercises_api::api::routes::create_routes;
use exercises_api::config::{AppConfig, DatabaseConfig, DatabaseSeeder, StorageBackend};
use exercises_api::store::{ExerciseStore, InMemoryExerciseStore};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store: Arc<dyn ExerciseStore> = match config.storage_backend {
        StorageBackend::Postgres => {
            let store = DatabaseConfig::from_env()?.connect_and_migrate().await?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(InMemoryExerciseStore::new())
        }
    };

    if config.seed_database {
        DatabaseSeeder::new(store.clone()).seed_all().await?;
    }

    let app = create_routes(store, &config.jwt_secret);

    let listener = TcpListener::bind(config.server_address()).await?;
    info!(
        environment = %config.environment,
        "Exercises API starting on http://{}",
        config.server_address()
    );
    info!("Health check available at http://{}/health", config.server_address());

    axum::serve(listener, app).await?;

    Ok(())
}
