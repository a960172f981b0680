//! Steane Code Model
//!
//! Classical model of the [[7,1,3]] color code: which qubits each stabilizer
//! checks, how a probe measurement reduces to a syndrome, and how syndrome
//! changes are decoded back into a single-qubit Pauli fault.
//!
//! # Core Components
//!
//! - **Topology**: [`StabilizerTopology`] with three colored plaquettes per
//!   basis
//! - **Syndromes**: [`Measurement`], [`SyndromeVector`], [`SyndromeDelta`]
//!   and the free functions [`parity`], [`syndrome_vector`], [`delta`]
//! - **Decoding**: [`SyndromeDecoder`] producing a [`DecodeResult`]
//! - **Faults**: [`Pauli`], [`ErrorEvent`], [`FaultPattern`] and the
//!   [`ErrorModel`] that samples them
//! - **States**: [`LogicalState`] and [`BlochAngles`]
//!
//! # Example: Decoding a Y Fault
//!
//! ```rust
//! use steane_code::{Classification, ColorCode, Pauli, SyndromeVector};
//!
//! let code = ColorCode::steane()?;
//!
//! let baseline_x = SyndromeVector::from_signs([1, 1, 1]);
//! let baseline_z = SyndromeVector::from_signs([1, 1, -1]);
//! let after_x = SyndromeVector::from_signs([-1, -1, 1]);
//! let after_z = SyndromeVector::from_signs([-1, -1, -1]);
//!
//! let result = code
//!     .decoder()
//!     .infer(baseline_x ^ after_x, baseline_z ^ after_z);
//!
//! assert_eq!(result.classification, Classification::Correctable);
//! assert_eq!(result.correction(), Some((4, Pauli::Y)));
//! # Ok::<(), steane_code::CodeError>(())
//! ```

pub mod decoder;
pub mod error;
pub mod error_model;
pub mod pauli;
pub mod state;
pub mod syndrome;
pub mod topology;

pub use decoder::{Classification, DecodeResult, STEANE_TABLE, SyndromeDecoder};
pub use error::{CodeError, CodeResult};
pub use error_model::{DEFAULT_MAX_FAULTS, DEFAULT_SUPPRESSION, ErrorModel, check_probability};
pub use pauli::{ErrorEvent, FaultPattern, Pauli};
pub use state::{BlochAngles, LogicalState};
pub use syndrome::{
    Measurement, SyndromeDelta, SyndromePair, SyndromeVector, basis_syndrome, delta, parity,
    syndrome_vector,
};
pub use topology::{Basis, Color, GROUP_WEIGHT, NUM_QUBITS, StabilizerGroup, StabilizerTopology};

/// Validated topology and decoder, built once and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCode {
    topology: StabilizerTopology,
    decoder: SyndromeDecoder,
}

impl ColorCode {
    /// The standard layout with [`STEANE_TABLE`], validated like any
    /// custom bundle.
    pub fn steane() -> CodeResult<Self> {
        Self::new(StabilizerTopology::steane(), STEANE_TABLE)
    }

    /// Bundle a custom topology and decode table after validating both.
    pub fn new(topology: StabilizerTopology, table: [Option<usize>; 8]) -> CodeResult<Self> {
        topology.validate()?;
        let decoder = SyndromeDecoder::new(table, &topology)?;
        tracing::debug!("validated decode table against stabilizer topology");
        Ok(Self { topology, decoder })
    }

    /// The stabilizer layout.
    pub fn topology(&self) -> &StabilizerTopology {
        &self.topology
    }

    /// The decoder.
    pub fn decoder(&self) -> &SyndromeDecoder {
        &self.decoder
    }

    /// Syndrome of a probe measurement taken in `basis`.
    pub fn syndrome(&self, basis: Basis, measurement: &Measurement) -> CodeResult<SyndromeVector> {
        basis_syndrome(&self.topology, basis, measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_bundle_validates() {
        let code = ColorCode::new(StabilizerTopology::steane(), STEANE_TABLE).unwrap();
        assert_eq!(code, ColorCode::steane().unwrap());
        assert_eq!(code.decoder(), &SyndromeDecoder::steane().unwrap());
    }

    #[test]
    fn test_mismatched_table_rejected_at_construction() {
        let mut table = STEANE_TABLE;
        table.swap(0b011, 0b101);
        assert!(matches!(
            ColorCode::new(StabilizerTopology::steane(), table),
            Err(CodeError::DecodeTableMismatch { .. })
        ));
    }

    #[test]
    fn test_single_faults_are_distinguishable() {
        // Every single X fault yields a distinct nonzero delta that decodes
        // back to its own qubit.
        let code = ColorCode::steane().unwrap();
        for q in 0..NUM_QUBITS {
            let mut bits = [0u8; NUM_QUBITS];
            bits[q] = 1;
            let flipped = code.syndrome(Basis::X, &Measurement::from_bits(&bits)).unwrap();
            let d = delta(SyndromeVector::default(), flipped);
            assert!(!d.is_zero());
            assert_eq!(code.decoder().locate(d), Some(q));
        }
    }
}
