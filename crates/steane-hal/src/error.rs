//! Error types for the HAL crate.

use thiserror::Error;

use crate::handle::StateHandle;

/// Errors reported by a QEC backend.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Backend is not available.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Logical state preparation failed.
    #[error("Encoding failed: {0}")]
    EncodingFailure(String),

    /// A probe measurement could not be taken.
    #[error("Measurement failed: {0}")]
    MeasurementFailure(String),

    /// The handle is unknown or was already released.
    #[error("Unknown state handle: {0}")]
    UnknownHandle(StateHandle),

    /// A fault or correction could not be applied.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Generic backend error.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
