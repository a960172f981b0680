//! Pauli frame over the seven data qubits.

use serde::{Deserialize, Serialize};
use steane_code::{NUM_QUBITS, Pauli};

/// Accumulated X and Z components of every Pauli applied to a block.
///
/// Phases are dropped; applying the same Pauli twice cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PauliFrame {
    x: [bool; NUM_QUBITS],
    z: [bool; NUM_QUBITS],
}

impl PauliFrame {
    /// The identity frame.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Multiply `pauli` on `qubit` into the frame.
    ///
    /// `qubit` must be in range; the backend checks before calling.
    pub fn apply(&mut self, qubit: usize, pauli: Pauli) {
        self.x[qubit] ^= pauli.has_x();
        self.z[qubit] ^= pauli.has_z();
    }

    /// Net Pauli on `qubit`, `None` for identity.
    pub fn get(&self, qubit: usize) -> Option<Pauli> {
        Pauli::from_components(self.x[qubit], self.z[qubit])
    }

    /// X components, seen by the X-basis probe.
    pub fn x_components(&self) -> &[bool; NUM_QUBITS] {
        &self.x
    }

    /// Z components, seen by the Z-basis probe.
    pub fn z_components(&self) -> &[bool; NUM_QUBITS] {
        &self.z
    }

    /// Number of qubits carrying a non-identity Pauli.
    pub fn weight(&self) -> usize {
        (0..NUM_QUBITS).filter(|&q| self.get(q).is_some()).count()
    }

    /// True if no net Pauli remains.
    pub fn is_identity(&self) -> bool {
        self.weight() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_composition() {
        let mut frame = PauliFrame::identity();
        frame.apply(4, Pauli::X);
        frame.apply(4, Pauli::Z);
        assert_eq!(frame.get(4), Some(Pauli::Y));
        assert_eq!(frame.weight(), 1);

        frame.apply(4, Pauli::Y);
        assert!(frame.is_identity());
    }
}
