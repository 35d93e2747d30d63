use std::sync::Arc;

use anyhow::Result;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

#[cfg(test)]
mod test_utils;

pub use config::{Config, StorageBackend};
pub use error::AppError;
pub use services::{ShiftEngine, ShiftError};

use database::{
    init_database,
    repositories::{MemoryStore, ShiftRepository, WorkerShiftRepository},
};

/// Build the engine over the storage backend named in the configuration.
pub async fn build_engine(config: &Config) -> Result<ShiftEngine> {
    let engine = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = init_database(&config.database_url).await?;
            ShiftEngine::new(
                Arc::new(ShiftRepository::new(pool.clone())),
                Arc::new(WorkerShiftRepository::new(pool)),
            )
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; data is lost on restart");
            let store = MemoryStore::new();
            ShiftEngine::new(Arc::new(store.clone()), Arc::new(store))
        }
    };

    Ok(engine.with_weekly_limit(config.max_shifts_per_week))
}
