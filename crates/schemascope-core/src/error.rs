//! Error types for schemascope

use thiserror::Error;

/// Core error type for schemascope operations
#[derive(Error, Debug)]
pub enum SchemaScopeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Failed to analyze schema: {0}")]
    Analysis(String),

    #[error("Failed to optimize schema: {0}")]
    Optimization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for schemascope operations
pub type Result<T> = std::result::Result<T, SchemaScopeError>;
