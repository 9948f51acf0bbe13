use connectors::error::{ConfigError, DbError, PoolError};
use engine::error::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connection pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),
}
