//! Pipeline lifecycle.
//!
//! ```text
//!   Created ──→ Encoded ──→ BaselineMeasured ──→ ErrorInjected ──→ ErrorMeasured
//!                               ↑   │ (repeat)         │ (repeat)
//!                  resume() ────┘   └──────────────────┘
//!
//!   ErrorMeasured ──→ Decoded ──→ Corrected ──→ Verified
//!
//!   any backend failure ──→ Aborted        release() ──→ Released
//! ```
//!
//! `Verified`, `Aborted` and `Released` are terminal for the trial; a
//! verified pipeline can be `resume`d for another round on the same block.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a pipeline is in its correction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineState {
    /// Nothing prepared yet.
    Created,
    /// Logical state prepared.
    Encoded,
    /// Fault-free reference syndromes stored.
    BaselineMeasured,
    /// Faults (possibly none) applied.
    ErrorInjected,
    /// Post-fault syndromes and deltas computed.
    ErrorMeasured,
    /// Decode result available.
    Decoded,
    /// Correction applied, skipped, or not needed.
    Corrected,
    /// Final syndromes compared with the baseline.
    Verified,
    /// A backend call failed; the trial is over.
    Aborted,
    /// The backend state was released.
    Released,
}

impl PipelineState {
    /// Get a human-readable state name.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Created => "CREATED",
            PipelineState::Encoded => "ENCODED",
            PipelineState::BaselineMeasured => "BASELINE_MEASURED",
            PipelineState::ErrorInjected => "ERROR_INJECTED",
            PipelineState::ErrorMeasured => "ERROR_MEASURED",
            PipelineState::Decoded => "DECODED",
            PipelineState::Corrected => "CORRECTED",
            PipelineState::Verified => "VERIFIED",
            PipelineState::Aborted => "ABORTED",
            PipelineState::Released => "RELEASED",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
