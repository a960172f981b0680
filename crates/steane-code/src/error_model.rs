//! Fault generation.
//!
//! Deterministic faults come from [`ErrorModel::inject`]. Stochastic faults
//! are drawn from an explicit, caller-owned RNG so that every experiment is
//! reproducible from its seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{CodeError, CodeResult};
use crate::pauli::{ErrorEvent, FaultPattern, Pauli};
use crate::topology::NUM_QUBITS;

/// Suppression factor between successive faults of the cascade sampler.
pub const DEFAULT_SUPPRESSION: f64 = 0.25;

/// Upper bound on faults drawn by the cascade sampler.
pub const DEFAULT_MAX_FAULTS: usize = 5;

/// Check that `value` is a finite probability.
pub fn check_probability(name: &'static str, value: f64) -> CodeResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(CodeError::InvalidProbability { name, value })
    }
}

/// Stochastic fault profile applied once per trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorModel {
    /// At most one fault, present with probability `p`.
    SingleQubit {
        /// Fault probability per trial.
        p: f64,
    },
    /// Up to `max_faults` faults; the k-th extra fault is added with
    /// probability `p * suppression^k`.
    Cascade {
        /// Probability of the first fault.
        p: f64,
        /// Multiplier applied after each added fault.
        suppression: f64,
        /// Hard cap on the number of faults.
        max_faults: usize,
    },
}

impl ErrorModel {
    /// Deterministic fault for tests and single-cycle walkthroughs.
    pub fn inject(qubit: usize, pauli: Pauli) -> CodeResult<ErrorEvent> {
        ErrorEvent::new(qubit, pauli)
    }

    /// With probability `p` return one uniformly chosen (qubit, pauli)
    /// fault, otherwise `None`.
    ///
    /// The acceptance draw always comes first, so two calls with RNGs in the
    /// same state and `p1 <= p2` produce a fault at `p2` whenever they do at
    /// `p1`, and it is the same fault.
    pub fn sample<R: Rng + ?Sized>(p: f64, rng: &mut R) -> CodeResult<Option<ErrorEvent>> {
        let p = check_probability("noise_probability", p)?;
        if rng.r#gen::<f64>() < p {
            Ok(Some(uniform_event(rng)))
        } else {
            Ok(None)
        }
    }

    /// Single-fault profile, validated.
    pub fn single_qubit(p: f64) -> CodeResult<Self> {
        Ok(ErrorModel::SingleQubit {
            p: check_probability("noise_probability", p)?,
        })
    }

    /// Cascade profile, validated.
    pub fn cascade(p: f64, suppression: f64, max_faults: usize) -> CodeResult<Self> {
        Ok(ErrorModel::Cascade {
            p: check_probability("noise_probability", p)?,
            suppression: check_probability("suppression", suppression)?,
            max_faults,
        })
    }

    /// Probability of at least one fault.
    pub fn noise_probability(&self) -> f64 {
        match *self {
            ErrorModel::SingleQubit { p } | ErrorModel::Cascade { p, .. } => p,
        }
    }

    /// The same profile at a different base probability.
    pub fn with_probability(&self, p: f64) -> CodeResult<Self> {
        match *self {
            ErrorModel::SingleQubit { .. } => Self::single_qubit(p),
            ErrorModel::Cascade {
                suppression,
                max_faults,
                ..
            } => Self::cascade(p, suppression, max_faults),
        }
    }

    /// Draw the faults of one trial.
    pub fn sample_pattern<R: Rng + ?Sized>(&self, rng: &mut R) -> CodeResult<FaultPattern> {
        match *self {
            ErrorModel::SingleQubit { p } => Ok(Self::sample(p, rng)?.into()),
            ErrorModel::Cascade {
                p,
                suppression,
                max_faults,
            } => {
                // All `max_faults` acceptance draws are consumed even after
                // the cascade stops, so the event draws that follow sit at the
                // same stream position for every `p`.
                let mut prob = check_probability("noise_probability", p)?;
                let mut count = 0;
                let mut open = true;
                for _ in 0..max_faults {
                    let u = rng.r#gen::<f64>();
                    if open && u < prob {
                        count += 1;
                        prob *= suppression;
                    } else {
                        open = false;
                    }
                }
                Ok(FaultPattern::from_events(
                    (0..count).map(|_| uniform_event(rng)),
                ))
            }
        }
    }
}

impl Default for ErrorModel {
    fn default() -> Self {
        ErrorModel::Cascade {
            p: 0.0,
            suppression: DEFAULT_SUPPRESSION,
            max_faults: DEFAULT_MAX_FAULTS,
        }
    }
}

fn uniform_event<R: Rng + ?Sized>(rng: &mut R) -> ErrorEvent {
    let qubit = rng.gen_range(0..NUM_QUBITS);
    let pauli = Pauli::ALL[rng.gen_range(0..Pauli::ALL.len())];
    ErrorEvent::new_unchecked(qubit, pauli)
}
