//! Rust engines for sliding-window sequence metrics
//!
//! `compute` holds the metric strategies, `window` the driver that walks a
//! sequence and dispatches to them, and `core` the optional parallel runtime.

pub mod core;
pub mod compute;
pub mod window;

/// Engine operation result type
pub type EngineResult<T> = Result<T, EngineError>;

/// Error types for engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("Computation error: {0}")]
    ComputationError(String),
}
