//! Syndrome model: parities, syndrome vectors and flip deltas.
//!
//! A probe measurement yields one bit per physical qubit. Restricting it to a
//! stabilizer's support and taking the mod-2 sum gives that stabilizer's
//! parity. Three parities in RED, GREEN, BLUE order form a
//! [`SyndromeVector`]; XOR of two vectors is a [`SyndromeDelta`], the index
//! into the decode table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitXor;

use crate::error::{CodeError, CodeResult};
use crate::topology::{Basis, NUM_QUBITS, StabilizerGroup, StabilizerTopology};

/// One shot of probe outcomes, one bit per physical qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    bits: Vec<bool>,
}

impl Measurement {
    /// Wrap raw outcome bits.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Build from 0/1 values; any non-zero value counts as 1.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self {
            bits: bits.iter().map(|&b| b != 0).collect(),
        }
    }

    /// Build from ±1 eigenvalues (+1 ↦ 0, −1 ↦ 1).
    pub fn from_signs(signs: &[i8]) -> Self {
        Self {
            bits: signs.iter().map(|&s| s < 0).collect(),
        }
    }

    /// Raw outcome bits.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for an empty measurement.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Reject measurements that do not cover the whole block.
    pub fn check_len(&self) -> CodeResult<()> {
        if self.bits.len() == NUM_QUBITS {
            Ok(())
        } else {
            Err(CodeError::MalformedMeasurement {
                expected: NUM_QUBITS,
                got: self.bits.len(),
            })
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.bits {
            write!(f, "{}", u8::from(b))?;
        }
        Ok(())
    }
}

/// Three parity bits, RED in bit 2, GREEN in bit 1, BLUE in bit 0.
///
/// A set bit means odd parity (stabilizer eigenvalue −1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SyndromeVector(u8);

impl SyndromeVector {
    /// Build from a raw 3-bit value; higher bits are discarded.
    pub fn from_raw(raw: u8) -> Self {
        Self(raw & 0b111)
    }

    /// Build from ±1 stabilizer eigenvalues in RGB order.
    pub fn from_signs(signs: [i8; 3]) -> Self {
        Self::from_raw(
            signs
                .iter()
                .fold(0, |acc, &s| (acc << 1) | u8::from(s < 0)),
        )
    }

    /// The raw 3-bit value.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// Parity bits in RGB order.
    pub fn bits(self) -> [u8; 3] {
        [(self.0 >> 2) & 1, (self.0 >> 1) & 1, self.0 & 1]
    }

    /// Stabilizer eigenvalues in RGB order (even parity ↦ +1).
    pub fn signs(self) -> [i8; 3] {
        self.bits().map(|b| if b == 0 { 1 } else { -1 })
    }
}

impl fmt::Display for SyndromeVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.signs();
        write!(f, "({r}, {g}, {b})")
    }
}

impl BitXor for SyndromeVector {
    type Output = SyndromeDelta;

    fn bitxor(self, rhs: Self) -> SyndromeDelta {
        delta(self, rhs)
    }
}

/// XOR of two syndrome vectors; one of eight values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SyndromeDelta(u8);

impl SyndromeDelta {
    /// The all-zero delta: no detected change.
    pub const ZERO: SyndromeDelta = SyndromeDelta(0);

    /// Build from a raw 3-bit value; higher bits are discarded.
    pub fn from_raw(raw: u8) -> Self {
        Self(raw & 0b111)
    }

    /// The raw 3-bit value, usable as a table index.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// True if no stabilizer flipped.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Flip bits in RGB order.
    pub fn bits(self) -> [u8; 3] {
        [(self.0 >> 2) & 1, (self.0 >> 1) & 1, self.0 & 1]
    }

    /// Every possible delta, zero first.
    pub fn all() -> impl Iterator<Item = SyndromeDelta> {
        (0u8..8).map(SyndromeDelta)
    }
}

impl fmt::Display for SyndromeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03b}", self.0)
    }
}

/// X- and Z-basis syndromes of one measurement round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SyndromePair {
    /// X-basis syndrome.
    pub x: SyndromeVector,
    /// Z-basis syndrome.
    pub z: SyndromeVector,
}

impl SyndromePair {
    /// Pair two vectors.
    pub fn new(x: SyndromeVector, z: SyndromeVector) -> Self {
        Self { x, z }
    }

    /// The vector of one basis.
    pub fn get(&self, basis: Basis) -> SyndromeVector {
        match basis {
            Basis::X => self.x,
            Basis::Z => self.z,
        }
    }

    /// Per-basis deltas against a reference pair.
    pub fn delta(&self, reference: &SyndromePair) -> (SyndromeDelta, SyndromeDelta) {
        (delta(reference.x, self.x), delta(reference.z, self.z))
    }
}

impl fmt::Display for SyndromePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X={} Z={}", self.x, self.z)
    }
}

/// Mod-2 sum of the measurement bits at `qubits`.
///
/// Fails if any index lies outside the measurement.
pub fn parity(measurement: &Measurement, qubits: &[usize]) -> CodeResult<u8> {
    qubits.iter().try_fold(0u8, |acc, &q| {
        measurement
            .bits()
            .get(q)
            .map(|&bit| acc ^ u8::from(bit))
            .ok_or(CodeError::QubitOutOfRange {
                index: q,
                num_qubits: measurement.len(),
            })
    })
}

/// Parities of the three groups, in the given (RGB) order.
pub fn syndrome_vector(
    measurement: &Measurement,
    groups: &[StabilizerGroup; 3],
) -> CodeResult<SyndromeVector> {
    measurement.check_len()?;
    let mut raw = 0u8;
    for group in groups {
        raw = (raw << 1) | parity(measurement, &group.qubits)?;
    }
    Ok(SyndromeVector(raw))
}

/// Syndrome of `measurement` taken in `basis`.
pub fn basis_syndrome(
    topology: &StabilizerTopology,
    basis: Basis,
    measurement: &Measurement,
) -> CodeResult<SyndromeVector> {
    syndrome_vector(measurement, topology.groups(basis))
}

/// Bitwise XOR of two syndrome vectors.
///
/// Commutative, and `delta(v, v)` is zero for every `v`.
pub fn delta(v1: SyndromeVector, v2: SyndromeVector) -> SyndromeDelta {
    SyndromeDelta(v1.0 ^ v2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity() {
        let m = Measurement::from_bits(&[1, 0, 1, 1, 0, 0, 0]);
        assert_eq!(parity(&m, &[0, 1, 2, 3]).unwrap(), 1);
        assert_eq!(parity(&m, &[2, 3, 4, 6]).unwrap(), 0);
        assert!(parity(&m, &[7]).is_err());
    }

    #[test]
    fn test_syndrome_vector_rgb_order() {
        let topology = StabilizerTopology::steane();
        // Only qubit 0 set: BLUE odd, RED and GREEN even.
        let m = Measurement::from_bits(&[1, 0, 0, 0, 0, 0, 0]);
        let v = basis_syndrome(&topology, Basis::X, &m).unwrap();
        assert_eq!(v.bits(), [0, 0, 1]);
        assert_eq!(v.signs(), [1, 1, -1]);
    }

    #[test]
    fn test_malformed_length() {
        let topology = StabilizerTopology::steane();
        let m = Measurement::from_bits(&[0, 1, 0]);
        assert_eq!(
            basis_syndrome(&topology, Basis::Z, &m),
            Err(CodeError::MalformedMeasurement {
                expected: 7,
                got: 3
            })
        );
    }

    #[test]
    fn test_signs_roundtrip() {
        let v = SyndromeVector::from_signs([1, 1, -1]);
        assert_eq!(v.raw(), 0b001);
        assert_eq!(v.to_string(), "(1, 1, -1)");
    }

    #[test]
    fn test_measurement_from_signs() {
        let m = Measurement::from_signs(&[1, -1, 1, 1, 1, 1, -1]);
        assert_eq!(m.to_string(), "0100001");
    }

    #[test]
    fn test_delta_self_inverse() {
        for raw in 0..8 {
            let v = SyndromeVector::from_raw(raw);
            assert!(delta(v, v).is_zero());
        }
    }

    #[test]
    fn test_pair_delta() {
        let base = SyndromePair::new(
            SyndromeVector::from_signs([1, 1, 1]),
            SyndromeVector::from_signs([1, 1, -1]),
        );
        let after = SyndromePair::new(
            SyndromeVector::from_signs([-1, -1, 1]),
            SyndromeVector::from_signs([-1, -1, -1]),
        );
        let (dx, dz) = after.delta(&base);
        assert_eq!(dx.raw(), 0b110);
        assert_eq!(dz.raw(), 0b110);
    }
}
