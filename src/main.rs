use std::sync::Arc;

use color_eyre::eyre::Result;
use coursetrack_api::{config::ApiConfig, ApiState};
use coursetrack_core::time::SystemClock;
use coursetrack_db::{create_pool, schema::initialize_database, PgStore};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url, config.db_max_connections).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // Wire the store and clock into the API
    let state = ApiState::new(
        Arc::new(PgStore::new(db_pool)),
        Arc::new(SystemClock),
        config.session_ttl(),
    );

    // Start API server
    coursetrack_api::start_server(config, Arc::new(state)).await?;

    Ok(())
}
