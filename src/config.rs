use anyhow::{Context, Result, bail};
use std::env;

use crate::database::models::MAXIMUM_WORKER_SHIFTS_PER_WEEK;

/// Where shifts and claims are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
    pub storage_backend: StorageBackend,
    pub max_shifts_per_week: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse()?;

        let max_shifts_per_week = match env::var("MAX_SHIFTS_PER_WEEK") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("MAX_SHIFTS_PER_WEEK must be a number, got '{}'", value))?,
            Err(_) => MAXIMUM_WORKER_SHIFTS_PER_WEEK,
        };
        if max_shifts_per_week < 1 {
            bail!("MAX_SHIFTS_PER_WEEK must be at least 1");
        }

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/roster".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            storage_backend,
            max_shifts_per_week,
        })
    }

    /// In-memory configuration for tests.
    pub fn test_config() -> Self {
        Config {
            database_url: String::new(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            storage_backend: StorageBackend::Memory,
            max_shifts_per_week: MAXIMUM_WORKER_SHIFTS_PER_WEEK,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
