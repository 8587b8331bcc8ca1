use thiserror::Error;

/// Errors raised by the core game abstractions.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Failed to fingerprint state: {0}")]
    Fingerprint(#[from] bincode::Error),
}

/// Convenience Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
