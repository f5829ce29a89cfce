//! Error types for the genome engine
//!
//! The stochastic operators never fail; they clamp or degrade to no-ops.
//! Errors only surface at the API boundary (recombination preconditions)
//! and when loading configuration.

/// Errors raised by the genome engine
#[derive(Debug, thiserror::Error)]
pub enum GenomeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenomeError>;
