//! Property-based tests for the syndrome model and decoder.

use proptest::prelude::*;
use steane_code::{
    Basis, Classification, ColorCode, Measurement, NUM_QUBITS, Pauli, SyndromeVector, delta,
};

fn arb_pauli() -> impl Strategy<Value = Pauli> {
    prop_oneof![Just(Pauli::X), Just(Pauli::Y), Just(Pauli::Z)]
}

fn arb_measurement() -> impl Strategy<Value = Measurement> {
    prop::collection::vec(any::<bool>(), NUM_QUBITS).prop_map(Measurement::new)
}

/// Flip the bits a Pauli fault leaves on a probe measurement of `basis`.
fn apply_fault(measurement: &Measurement, qubit: usize, pauli: Pauli, basis: Basis) -> Measurement {
    let flips = match basis {
        Basis::X => pauli.has_x(),
        Basis::Z => pauli.has_z(),
    };
    let mut bits = measurement.bits().to_vec();
    bits[qubit] ^= flips;
    Measurement::new(bits)
}

proptest! {
    /// Delta is commutative and self-inverse.
    #[test]
    fn test_delta_algebra(a in 0u8..8, b in 0u8..8) {
        let (va, vb) = (SyndromeVector::from_raw(a), SyndromeVector::from_raw(b));
        prop_assert_eq!(delta(va, vb), delta(vb, va));
        prop_assert!(delta(va, va).is_zero());
    }

    /// Any single-qubit fault on any measurement is located and typed.
    ///
    /// The reference measurement is arbitrary: only the change matters.
    #[test]
    fn test_single_fault_decodes(
        reference in arb_measurement(),
        qubit in 0..NUM_QUBITS,
        pauli in arb_pauli(),
    ) {
        let code = ColorCode::steane().unwrap();

        let base_x = code.syndrome(Basis::X, &reference).unwrap();
        let base_z = code.syndrome(Basis::Z, &reference).unwrap();
        let post_x = code.syndrome(Basis::X, &apply_fault(&reference, qubit, pauli, Basis::X)).unwrap();
        let post_z = code.syndrome(Basis::Z, &apply_fault(&reference, qubit, pauli, Basis::Z)).unwrap();

        let result = code.decoder().infer(delta(base_x, post_x), delta(base_z, post_z));
        prop_assert_eq!(result.classification, Classification::Correctable);
        prop_assert_eq!(result.correction(), Some((qubit, pauli)));
    }

    /// Deltas from two different qubits never decode to the same qubit.
    #[test]
    fn test_locate_is_injective(q1 in 0..NUM_QUBITS, q2 in 0..NUM_QUBITS) {
        prop_assume!(q1 != q2);
        let code = ColorCode::steane().unwrap();
        let topology = code.topology();
        let d1 = steane_code::SyndromeDelta::from_raw(topology.membership(q1));
        let d2 = steane_code::SyndromeDelta::from_raw(topology.membership(q2));
        prop_assert_ne!(code.decoder().locate(d1), code.decoder().locate(d2));
    }

    /// Syndromes depend only on the measurement.
    #[test]
    fn test_syndrome_is_deterministic(m in arb_measurement()) {
        let code = ColorCode::steane().unwrap();
        prop_assert_eq!(
            code.syndrome(Basis::Z, &m).unwrap(),
            code.syndrome(Basis::Z, &m).unwrap()
        );
    }
}
