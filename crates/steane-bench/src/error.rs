//! Error handling for experiment runs.

use steane_code::CodeError;
use steane_pipeline::PipelineError;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;

/// Errors that stop an experiment before or between sweep points.
///
/// Individual trial failures are counted, not raised.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BenchError {
    /// Invalid experiment configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid code-level parameter.
    #[error(transparent)]
    Code(#[from] CodeError),

    /// A pipeline failure outside any trial.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
