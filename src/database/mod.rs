pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod seed;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryNewsStore;
pub use repository::{NewsStore, PgNewsStore};

use std::sync::Arc;

use tracing::info;

use crate::config::DatabaseConfig;

/// Open the configured store: PostgreSQL when a URL is set, memory otherwise
pub async fn open_store(config: &DatabaseConfig) -> Result<Arc<dyn NewsStore>, DatabaseError> {
    if config.url.is_none() {
        info!("DATABASE_URL not set; keeping news in memory");
        return Ok(Arc::new(MemoryNewsStore::new()));
    }

    let pool = DatabaseManager::connect(config).await?;
    DatabaseManager::ensure_schema(&pool).await?;
    DatabaseManager::verify_schema(&pool).await?;
    Ok(Arc::new(PgNewsStore::new(pool)))
}
