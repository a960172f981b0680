//! Lookup-table decoder for single-qubit faults.
//!
//! The table maps each of the eight 3-bit syndrome deltas to a qubit index,
//! with the all-zero delta meaning "no error". Combining the X-basis and
//! Z-basis deltas of one trial identifies the Pauli type:
//!
//! | `dx` | `dz` | result |
//! |------|------|--------|
//! | 0    | 0    | no error |
//! | ≠0   | 0    | X at `locate(dx)` |
//! | 0    | ≠0   | Z at `locate(dz)` |
//! | ≠0   | ≠0   | Y if `locate(dx) == locate(dz)`, else uncorrectable |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CodeError, CodeResult};
use crate::pauli::Pauli;
use crate::syndrome::SyndromeDelta;
use crate::topology::{NUM_QUBITS, StabilizerTopology};

/// Outcome class of a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Both deltas are zero.
    NoError,
    /// A single-qubit fault was identified.
    Correctable,
    /// The deltas cannot come from one single-qubit fault.
    Uncorrectable,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::NoError => write!(f, "NO_ERROR"),
            Classification::Correctable => write!(f, "CORRECTABLE"),
            Classification::Uncorrectable => write!(f, "UNCORRECTABLE"),
        }
    }
}

/// Result of combining the X- and Z-basis deltas of one trial.
///
/// `qubit` and `pauli` are both `Some` exactly when the classification is
/// [`Classification::Correctable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodeResult {
    /// Implicated qubit.
    pub qubit: Option<usize>,
    /// Inferred Pauli type.
    pub pauli: Option<Pauli>,
    /// Outcome class.
    pub classification: Classification,
}

impl DecodeResult {
    /// Nothing detected.
    pub fn no_error() -> Self {
        Self {
            qubit: None,
            pauli: None,
            classification: Classification::NoError,
        }
    }

    /// A located single-qubit fault.
    pub fn correctable(qubit: usize, pauli: Pauli) -> Self {
        Self {
            qubit: Some(qubit),
            pauli: Some(pauli),
            classification: Classification::Correctable,
        }
    }

    /// Inconsistent deltas.
    pub fn uncorrectable() -> Self {
        Self {
            qubit: None,
            pauli: None,
            classification: Classification::Uncorrectable,
        }
    }

    /// The (qubit, pauli) pair to undo, if any.
    pub fn correction(&self) -> Option<(usize, Pauli)> {
        self.qubit.zip(self.pauli)
    }
}

impl fmt::Display for DecodeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.classification, self.correction()) {
            (Classification::Correctable, Some((q, p))) => write!(f, "{p} error on qubit {q}"),
            (Classification::Uncorrectable, _) => write!(f, "uncorrectable syndrome"),
            _ => write!(f, "no error"),
        }
    }
}

/// Eight-entry delta → qubit table, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyndromeDecoder {
    table: [Option<usize>; 8],
}

/// Decode table of the standard [[7,1,3]] layout, indexed by RGB delta bits:
/// `001→0, 011→1, 111→2, 101→3, 110→4, 010→5, 100→6`.
pub const STEANE_TABLE: [Option<usize>; 8] = [
    None,
    Some(0),
    Some(5),
    Some(1),
    Some(6),
    Some(3),
    Some(4),
    Some(2),
];

impl SyndromeDecoder {
    /// [`STEANE_TABLE`] checked against the standard topology.
    pub fn steane() -> CodeResult<Self> {
        Self::new(STEANE_TABLE, &StabilizerTopology::steane())
    }

    /// Build a decoder from an explicit table and check it against
    /// `topology`.
    ///
    /// The zero delta must map to `None` and the seven nonzero deltas must
    /// map bijectively onto qubits 0..7. Each qubit's key must also equal the
    /// color-membership pattern the topology gives it, otherwise the decoder
    /// would correct the wrong qubit.
    pub fn new(table: [Option<usize>; 8], topology: &StabilizerTopology) -> CodeResult<Self> {
        if let Some(q) = table[0] {
            return Err(CodeError::DecodeTableNotBijective(format!(
                "zero delta maps to qubit {q}"
            )));
        }

        let mut seen = [false; NUM_QUBITS];
        for (pattern, entry) in table.iter().enumerate().skip(1) {
            let Some(qubit) = *entry else {
                return Err(CodeError::DecodeTableNotBijective(format!(
                    "delta {pattern:03b} has no qubit"
                )));
            };
            if qubit >= NUM_QUBITS {
                return Err(CodeError::QubitOutOfRange {
                    index: qubit,
                    num_qubits: NUM_QUBITS,
                });
            }
            if std::mem::replace(&mut seen[qubit], true) {
                return Err(CodeError::DecodeTableNotBijective(format!(
                    "qubit {qubit} appears more than once"
                )));
            }
            let expected = topology.membership(qubit);
            if expected != pattern as u8 {
                return Err(CodeError::DecodeTableMismatch {
                    pattern: pattern as u8,
                    qubit,
                    expected,
                });
            }
        }

        Ok(Self { table })
    }

    /// Qubit implicated by `delta`, `None` for the zero delta.
    #[inline]
    pub fn locate(&self, delta: SyndromeDelta) -> Option<usize> {
        self.table[usize::from(delta.raw())]
    }

    /// Combine both bases' deltas into a [`DecodeResult`].
    pub fn infer(&self, dx: SyndromeDelta, dz: SyndromeDelta) -> DecodeResult {
        match (self.locate(dx), self.locate(dz)) {
            (None, None) => DecodeResult::no_error(),
            (Some(q), None) => DecodeResult::correctable(q, Pauli::X),
            (None, Some(q)) => DecodeResult::correctable(q, Pauli::Z),
            (Some(qx), Some(qz)) if qx == qz => DecodeResult::correctable(qx, Pauli::Y),
            (Some(_), Some(_)) => DecodeResult::uncorrectable(),
        }
    }

    /// The raw table.
    pub fn table(&self) -> &[Option<usize>; 8] {
        &self.table
    }
}
