//! Error types for the code crate.

use thiserror::Error;

/// Errors raised while building or validating code configuration.
///
/// Everything here is fatal at configuration time: none of these can occur
/// once a [`ColorCode`](crate::ColorCode) has been constructed and a trial
/// is running, except [`CodeError::MalformedMeasurement`] which guards the
/// syndrome model against collaborator output of the wrong length.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CodeError {
    /// A qubit index lies outside the code block.
    #[error("Invalid configuration: qubit index {index} out of range (block has {num_qubits} qubits)")]
    QubitOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of physical qubits in the block.
        num_qubits: usize,
    },

    /// A Pauli tag could not be parsed.
    #[error("Invalid configuration: unknown Pauli tag '{0}'")]
    UnknownPauli(String),

    /// A probability parameter lies outside [0, 1] or is not finite.
    #[error("Invalid configuration: {name} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The stabilizer topology is malformed.
    #[error("Invalid configuration: stabilizer topology {0}")]
    InvalidTopology(String),

    /// The decode table is not a bijection between nonzero deltas and qubits.
    #[error("Invalid configuration: decode table is not bijective: {0}")]
    DecodeTableNotBijective(String),

    /// The decode table disagrees with the stabilizer topology.
    #[error(
        "Invalid configuration: decode table maps {pattern:03b} to qubit {qubit}, \
         but qubit {qubit} produces {expected:03b}"
    )]
    DecodeTableMismatch {
        /// Pattern stored in the table.
        pattern: u8,
        /// Qubit the table assigns to the pattern.
        qubit: usize,
        /// Pattern implied by the topology for that qubit.
        expected: u8,
    },

    /// An unknown logical state name.
    #[error("Invalid configuration: unknown logical state '{0}'")]
    UnknownState(String),

    /// A measurement has the wrong number of outcomes.
    #[error("Malformed measurement: expected {expected} outcomes, got {got}")]
    MalformedMeasurement {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
}

/// Result type for code operations.
pub type CodeResult<T> = Result<T, CodeError>;
