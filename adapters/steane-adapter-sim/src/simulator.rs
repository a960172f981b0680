//! Simulator backend implementation.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use steane_code::{BlochAngles, ColorCode, Measurement, NUM_QUBITS, Pauli, SyndromeVector};
use steane_hal::{BackendAvailability, Basis, HalError, HalResult, QecBackend, StateHandle};

use crate::frame::PauliFrame;

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Backend name reported by [`QecBackend::name`].
    pub name: String,
    /// Fault-free X-basis stabilizer eigenvalues, RGB order.
    pub x_signs: [i8; 3],
    /// Fault-free Z-basis stabilizer eigenvalues, RGB order.
    pub z_signs: [i8; 3],
    /// Seed for shot-to-shot measurement randomness; `None` uses entropy.
    pub seed: Option<u64>,
    /// Fail every n-th measurement call with `MeasurementFailure`.
    pub fail_every_nth_measurement: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            name: "pauli_frame_simulator".into(),
            x_signs: [1, 1, 1],
            z_signs: [1, 1, -1],
            seed: None,
            fail_every_nth_measurement: None,
        }
    }
}

/// One prepared block.
struct SimState {
    angles: BlochAngles,
    frame: PauliFrame,
}

/// Local Pauli-frame simulator.
///
/// Each handle tracks the net Pauli applied to its block. A probe in one
/// basis returns a reference outcome whose color parities equal the
/// configured stabilizer signs, masked by a random codeword of the
/// classical Hamming code (all parities even) and flipped wherever the
/// frame has a component the probe sees.
pub struct SimulatorBackend {
    config: SimulatorConfig,
    code: Arc<ColorCode>,
    states: Mutex<FxHashMap<StateHandle, SimState>>,
    rng: Mutex<StdRng>,
    available: AtomicBool,
    measurements: AtomicU64,
    corrections: AtomicU64,
}

impl SimulatorBackend {
    /// Create a simulator with default settings.
    pub fn new() -> HalResult<Self> {
        Self::with_config(SimulatorConfig::default())
    }

    /// Create a simulator with deterministic measurement randomness.
    pub fn seeded(seed: u64) -> HalResult<Self> {
        Self::with_config(SimulatorConfig {
            seed: Some(seed),
            ..SimulatorConfig::default()
        })
    }

    /// Create a simulator from explicit settings over a freshly validated
    /// Steane layout.
    pub fn with_config(config: SimulatorConfig) -> HalResult<Self> {
        let code = ColorCode::steane().map_err(|e| HalError::Backend(e.to_string()))?;
        Ok(Self::with_code(config, Arc::new(code)))
    }

    /// Create a simulator sharing an already validated layout.
    pub fn with_code(config: SimulatorConfig, code: Arc<ColorCode>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            code,
            states: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(rng),
            available: AtomicBool::new(true),
            measurements: AtomicU64::new(0),
            corrections: AtomicU64::new(0),
        }
    }

    /// Take the backend offline or bring it back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Net Pauli frame currently held by `handle`.
    pub fn residual_frame(&self, handle: &StateHandle) -> HalResult<PauliFrame> {
        let states = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        states
            .get(handle)
            .map(|s| s.frame)
            .ok_or(HalError::UnknownHandle(*handle))
    }

    /// Bloch angles `handle` was encoded with.
    pub fn encoded_angles(&self, handle: &StateHandle) -> HalResult<BlochAngles> {
        let states = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        states
            .get(handle)
            .map(|s| s.angles)
            .ok_or(HalError::UnknownHandle(*handle))
    }

    /// Number of live handles.
    pub fn live_states(&self) -> usize {
        self.states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Number of measurement calls served, failed ones included.
    pub fn measurement_count(&self) -> u64 {
        self.measurements.load(Ordering::SeqCst)
    }

    /// Number of corrections applied.
    pub fn correction_count(&self) -> u64 {
        self.corrections.load(Ordering::SeqCst)
    }

    fn signs(&self, basis: Basis) -> [i8; 3] {
        match basis {
            Basis::X => self.config.x_signs,
            Basis::Z => self.config.z_signs,
        }
    }

    /// Outcome bits whose color parities equal `signs`.
    fn reference_bits(&self, signs: [i8; 3]) -> [bool; NUM_QUBITS] {
        let mut bits = [false; NUM_QUBITS];
        let target = SyndromeVector::from_signs(signs).raw();
        if let Some(q) = (0..NUM_QUBITS).find(|&q| self.code.topology().membership(q) == target) {
            bits[q] = true;
        }
        bits
    }

    /// Uniform codeword of the kernel of the parity checks.
    ///
    /// The three plaquette supports and the all-ones word span the kernel.
    fn random_codeword(&self) -> [bool; NUM_QUBITS] {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut word = [false; NUM_QUBITS];
        for group in self.code.topology().groups(Basis::Z) {
            if rng.r#gen::<bool>() {
                for &q in &group.qubits {
                    word[q] ^= true;
                }
            }
        }
        if rng.r#gen::<bool>() {
            word.iter_mut().for_each(|b| *b ^= true);
        }
        word
    }

    fn check_qubit(qubit: usize) -> HalResult<()> {
        if qubit < NUM_QUBITS {
            Ok(())
        } else {
            Err(HalError::InvalidOperation(format!(
                "qubit {qubit} out of range (block has {NUM_QUBITS} qubits)"
            )))
        }
    }

    fn apply_pauli(&self, handle: &StateHandle, qubit: usize, pauli: Pauli) -> HalResult<()> {
        Self::check_qubit(qubit)?;
        let mut states = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let state = states
            .get_mut(handle)
            .ok_or(HalError::UnknownHandle(*handle))?;
        state.frame.apply(qubit, pauli);
        Ok(())
    }
}

#[async_trait]
impl QecBackend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        if self.available.load(Ordering::SeqCst) {
            Ok(BackendAvailability::always_available())
        } else {
            Ok(BackendAvailability::unavailable("simulator taken offline"))
        }
    }

    #[instrument(skip(self))]
    async fn encode(&self, theta: f64, phi: f64) -> HalResult<StateHandle> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(HalError::BackendUnavailable(self.config.name.clone()));
        }
        let angles = BlochAngles::new(theta, phi);
        if !angles.is_finite() {
            return Err(HalError::EncodingFailure(format!(
                "non-finite Bloch angles {angles}"
            )));
        }

        let handle = StateHandle::new();
        let mut states = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        states.insert(
            handle,
            SimState {
                angles,
                frame: PauliFrame::identity(),
            },
        );
        debug!(%handle, "encoded logical state");
        Ok(handle)
    }

    async fn inject_fault(
        &self,
        handle: &StateHandle,
        qubit: usize,
        pauli: Pauli,
    ) -> HalResult<()> {
        self.apply_pauli(handle, qubit, pauli)?;
        debug!(%handle, qubit, %pauli, "injected fault");
        Ok(())
    }

    async fn measure(&self, handle: &StateHandle, basis: Basis) -> HalResult<Measurement> {
        let call = self.measurements.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(n) = self.config.fail_every_nth_measurement {
            if n > 0 && call % n == 0 {
                return Err(HalError::MeasurementFailure(format!(
                    "injected failure on measurement call {call}"
                )));
            }
        }

        let frame = self.residual_frame(handle)?;
        let flips = match basis {
            Basis::X => frame.x_components(),
            Basis::Z => frame.z_components(),
        };
        let reference = self.reference_bits(self.signs(basis));
        let mask = self.random_codeword();

        let bits = (0..NUM_QUBITS)
            .map(|q| reference[q] ^ mask[q] ^ flips[q])
            .collect();
        Ok(Measurement::new(bits))
    }

    async fn apply_correction(
        &self,
        handle: &StateHandle,
        qubit: usize,
        pauli: Pauli,
    ) -> HalResult<()> {
        self.apply_pauli(handle, qubit, pauli)?;
        self.corrections.fetch_add(1, Ordering::SeqCst);
        debug!(%handle, qubit, %pauli, "applied correction");
        Ok(())
    }

    async fn release(&self, handle: &StateHandle) -> HalResult<()> {
        let mut states = self
            .states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        states
            .remove(handle)
            .map(|_| ())
            .ok_or(HalError::UnknownHandle(*handle))
    }
}
