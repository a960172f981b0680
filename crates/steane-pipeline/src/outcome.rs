//! Per-trial results.

use serde::{Deserialize, Serialize};
use std::fmt;
use steane_code::{DecodeResult, Pauli, SyndromeDelta, SyndromePair};

/// What `correct()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CorrectionAction {
    /// Nothing detected, nothing applied.
    NotNeeded,
    /// The inverse Pauli was applied.
    Applied {
        /// Corrected qubit.
        qubit: usize,
        /// Applied Pauli.
        pauli: Pauli,
    },
    /// Uncorrectable syndrome; no operator attempted.
    Skipped,
}

impl fmt::Display for CorrectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionAction::NotNeeded => write!(f, "no correction needed"),
            CorrectionAction::Applied { qubit, pauli } => {
                write!(f, "applied {pauli} on qubit {qubit}")
            }
            CorrectionAction::Skipped => write!(f, "correction skipped"),
        }
    }
}

/// Everything observed during one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Fault-free reference syndromes.
    pub baseline_syndrome: SyndromePair,
    /// Syndromes after fault injection.
    pub post_error_syndrome: SyndromePair,
    /// X- and Z-basis deltas against the baseline.
    pub deltas: (SyndromeDelta, SyndromeDelta),
    /// Decoder verdict.
    pub decode_result: DecodeResult,
    /// What the correction step did.
    pub correction: CorrectionAction,
    /// Syndromes after correction.
    pub post_correction_syndrome: SyndromePair,
    /// `post_correction_syndrome == baseline_syndrome`.
    pub success: bool,
}

impl TrialOutcome {
    /// True if the fault left no detectable syndrome change.
    ///
    /// Postselection accepts exactly these trials.
    pub fn syndrome_unchanged(&self) -> bool {
        self.post_error_syndrome == self.baseline_syndrome
    }
}
