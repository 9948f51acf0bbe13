use connectors::error::DbError;
use thiserror::Error;

/// Top-level errors for a batch scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A page fetch failed. The run halts; rows up to the current cursor
    /// stay processed, later rows are untouched.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// The caller-supplied row handler failed; handler errors are
    /// run-fatal unless the handler wraps its own recovery.
    #[error("row handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A fetched row lacks a usable numeric identifier, so the cursor
    /// cannot advance.
    #[error("row is missing a numeric '{column}' identifier")]
    MissingIdentifier { column: String },

    #[error("scan cancelled before completion")]
    Cancelled,
}
