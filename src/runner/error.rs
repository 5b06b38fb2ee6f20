//! Container runner error types

use thiserror::Error;

/// Error types for container runner operations
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to start container engine: {0}")]
    Spawn(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Internal error: {0}")]
    Internal(String),
}
