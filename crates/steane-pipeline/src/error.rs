//! Error types for the pipeline crate.

use steane_code::{Basis, CodeError};
use steane_hal::HalError;
use thiserror::Error;

use crate::state::PipelineState;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors that abort a trial.
///
/// An uncorrectable syndrome is not an error; it is reported through
/// [`Classification::Uncorrectable`](steane_code::Classification).
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// A step was invoked out of order.
    #[error("Illegal pipeline state: cannot {operation} while {state}")]
    IllegalState {
        /// The rejected step.
        operation: &'static str,
        /// The state the pipeline was in.
        state: PipelineState,
    },

    /// The backend failed.
    #[error(transparent)]
    Backend(#[from] HalError),

    /// The backend returned a measurement of the wrong length.
    #[error("Malformed {basis}-basis measurement: expected {expected} outcomes, got {got}")]
    MalformedMeasurement {
        /// Probed basis.
        basis: Basis,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Invalid code-level input.
    #[error(transparent)]
    Code(#[from] CodeError),
}

impl PipelineError {
    /// True for failures on the collaborator side, as opposed to misuse of
    /// the state machine.
    pub fn is_backend_failure(&self) -> bool {
        matches!(
            self,
            PipelineError::Backend(_) | PipelineError::MalformedMeasurement { .. }
        )
    }

    /// True if the backend reported itself unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PipelineError::Backend(HalError::BackendUnavailable(_)))
    }
}
