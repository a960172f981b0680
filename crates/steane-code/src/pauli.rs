//! Pauli faults and fault patterns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CodeError, CodeResult};
use crate::topology::NUM_QUBITS;

/// Single-qubit non-identity Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Pauli {
    /// Bit flip.
    X,
    /// Combined bit and phase flip.
    Y,
    /// Phase flip.
    Z,
}

impl Pauli {
    /// All three Paulis in the order used for uniform sampling.
    pub const ALL: [Pauli; 3] = [Pauli::X, Pauli::Y, Pauli::Z];

    /// Whether this Pauli anticommutes with Z (flips the computational basis).
    pub fn has_x(self) -> bool {
        matches!(self, Pauli::X | Pauli::Y)
    }

    /// Whether this Pauli anticommutes with X (flips the Hadamard basis).
    pub fn has_z(self) -> bool {
        matches!(self, Pauli::Y | Pauli::Z)
    }

    /// Build a Pauli from its X and Z components; `None` for the identity.
    pub fn from_components(x: bool, z: bool) -> Option<Self> {
        match (x, z) {
            (false, false) => None,
            (true, false) => Some(Pauli::X),
            (true, true) => Some(Pauli::Y),
            (false, true) => Some(Pauli::Z),
        }
    }

    /// Inverse Pauli. Every Pauli is self-inverse up to a global phase.
    pub fn inverse(self) -> Self {
        self
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pauli::X => write!(f, "X"),
            Pauli::Y => write!(f, "Y"),
            Pauli::Z => write!(f, "Z"),
        }
    }
}

impl FromStr for Pauli {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" | "0" => Ok(Pauli::X),
            "Y" | "y" | "1" => Ok(Pauli::Y),
            "Z" | "z" | "2" => Ok(Pauli::Z),
            other => Err(CodeError::UnknownPauli(other.to_string())),
        }
    }
}

/// A single-qubit Pauli fault on one physical qubit of the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorEvent {
    qubit: usize,
    pauli: Pauli,
}

impl ErrorEvent {
    /// Create an event, rejecting indices outside the block.
    pub fn new(qubit: usize, pauli: Pauli) -> CodeResult<Self> {
        if qubit >= NUM_QUBITS {
            return Err(CodeError::QubitOutOfRange {
                index: qubit,
                num_qubits: NUM_QUBITS,
            });
        }
        Ok(Self { qubit, pauli })
    }

    /// Caller guarantees `qubit < NUM_QUBITS`.
    pub(crate) fn new_unchecked(qubit: usize, pauli: Pauli) -> Self {
        debug_assert!(qubit < NUM_QUBITS);
        Self { qubit, pauli }
    }

    /// The affected qubit.
    pub fn qubit(&self) -> usize {
        self.qubit
    }

    /// The applied Pauli.
    pub fn pauli(&self) -> Pauli {
        self.pauli
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on qubit {}", self.pauli, self.qubit)
    }
}

/// Ordered list of faults injected within one trial.
///
/// An empty pattern means no fault occurred this shot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultPattern {
    events: Vec<ErrorEvent>,
}

impl FaultPattern {
    /// The empty pattern.
    pub fn none() -> Self {
        Self::default()
    }

    /// A pattern holding exactly one event.
    pub fn single(event: ErrorEvent) -> Self {
        Self {
            events: vec![event],
        }
    }

    /// Build a pattern from events in injection order.
    pub fn from_events(events: impl IntoIterator<Item = ErrorEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events in injection order.
    pub fn events(&self) -> &[ErrorEvent] {
        &self.events
    }

    /// Number of injected faults (not the weight of the net operator).
    pub fn weight(&self) -> usize {
        self.events.len()
    }

    /// True if no fault was injected.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Net Pauli acting on each qubit after all events, ignoring phase.
    pub fn net_operator(&self) -> [Option<Pauli>; NUM_QUBITS] {
        let mut x = [false; NUM_QUBITS];
        let mut z = [false; NUM_QUBITS];
        for event in &self.events {
            x[event.qubit] ^= event.pauli.has_x();
            z[event.qubit] ^= event.pauli.has_z();
        }
        std::array::from_fn(|q| Pauli::from_components(x[q], z[q]))
    }

    /// True if the events multiply to the identity, i.e. the block is left
    /// exactly as it was prepared.
    pub fn is_trivial(&self) -> bool {
        self.net_operator().iter().all(Option::is_none)
    }
}

impl From<Option<ErrorEvent>> for FaultPattern {
    fn from(event: Option<ErrorEvent>) -> Self {
        event.map_or_else(Self::none, Self::single)
    }
}

impl From<ErrorEvent> for FaultPattern {
    fn from(event: ErrorEvent) -> Self {
        Self::single(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pauli_components() {
        assert!(Pauli::X.has_x() && !Pauli::X.has_z());
        assert!(Pauli::Y.has_x() && Pauli::Y.has_z());
        assert!(!Pauli::Z.has_x() && Pauli::Z.has_z());
        for p in Pauli::ALL {
            assert_eq!(Pauli::from_components(p.has_x(), p.has_z()), Some(p));
        }
        assert_eq!(Pauli::from_components(false, false), None);
    }

    #[test]
    fn test_pauli_parse() {
        assert_eq!("Y".parse::<Pauli>().unwrap(), Pauli::Y);
        assert_eq!("2".parse::<Pauli>().unwrap(), Pauli::Z);
        assert!(matches!(
            "W".parse::<Pauli>(),
            Err(CodeError::UnknownPauli(_))
        ));
    }

    #[test]
    fn test_event_range() {
        assert!(ErrorEvent::new(6, Pauli::X).is_ok());
        assert!(matches!(
            ErrorEvent::new(7, Pauli::X),
            Err(CodeError::QubitOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_pattern_cancellation() {
        let x0 = ErrorEvent::new(0, Pauli::X).unwrap();
        let z0 = ErrorEvent::new(0, Pauli::Z).unwrap();
        let y0 = ErrorEvent::new(0, Pauli::Y).unwrap();

        assert!(FaultPattern::from_events([x0, x0]).is_trivial());
        assert!(FaultPattern::from_events([x0, z0, y0]).is_trivial());

        let xz = FaultPattern::from_events([x0, z0]);
        assert!(!xz.is_trivial());
        assert_eq!(xz.net_operator()[0], Some(Pauli::Y));
        assert_eq!(xz.weight(), 2);
    }

    #[test]
    fn test_pattern_from_option() {
        assert!(FaultPattern::from(None).is_empty());
        let e = ErrorEvent::new(3, Pauli::Z).unwrap();
        assert_eq!(FaultPattern::from(Some(e)).events(), &[e]);
    }
}
