//! Aggregated sweep-point results.

use serde::{Deserialize, Serialize};
use std::fmt;
use steane_code::Classification;
use steane_pipeline::TrialOutcome;

/// How much of a sweep point actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every trial completed.
    Complete,
    /// Some trials aborted but the point ran to the end.
    Partial,
    /// The point was stopped early.
    Abandoned,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Complete => write!(f, "complete"),
            RunStatus::Partial => write!(f, "partial"),
            RunStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Statistics of one `(noise_level, shots)` configuration.
///
/// Fidelities and the waste fraction are ratios over completed trials;
/// aborted trials are reported separately and never count as successes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Per-trial fault probability.
    pub noise_level: f64,
    /// Requested trials.
    pub shots: usize,
    /// Fraction of trials whose net fault was the identity.
    pub baseline_fidelity: f64,
    /// Error-free fraction among trials with an unchanged syndrome.
    pub postselected_fidelity: f64,
    /// Fraction of trials rejected by postselection.
    pub waste_fraction: f64,
    /// Fraction of trials whose syndrome returned to baseline after correction.
    pub corrected_fidelity: f64,
    /// Trials that ran to verification.
    pub completed_trials: usize,
    /// Trials stopped by a collaborator failure.
    pub aborted_trials: usize,
    /// Trials whose decoder verdict was uncorrectable.
    pub uncorrectable_trials: usize,
    /// Trials accepted by postselection.
    pub accepted_trials: usize,
    /// Completed trials indexed by sampled fault weight.
    pub weight_histogram: Vec<usize>,
    /// Run status.
    pub status: RunStatus,
}

impl ExperimentResult {
    /// Whether any trial aborted or the point was cut short.
    pub fn is_degraded(&self) -> bool {
        self.status != RunStatus::Complete
    }

    /// `1 - baseline_fidelity`.
    pub fn baseline_error_rate(&self) -> f64 {
        1.0 - self.baseline_fidelity
    }

    /// `1 - postselected_fidelity`.
    pub fn postselected_error_rate(&self) -> f64 {
        1.0 - self.postselected_fidelity
    }

    /// `1 - corrected_fidelity`.
    pub fn corrected_error_rate(&self) -> f64 {
        1.0 - self.corrected_fidelity
    }
}

/// The flat record consumed by plotting and CLI tooling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    pub noise_level: f64,
    pub shots: usize,
    pub baseline_fidelity: f64,
    pub postselected_fidelity: f64,
    pub waste_fraction: f64,
    pub corrected_fidelity: f64,
}

impl From<&ExperimentResult> for ExperimentRecord {
    fn from(r: &ExperimentResult) -> Self {
        Self {
            noise_level: r.noise_level,
            shots: r.shots,
            baseline_fidelity: r.baseline_fidelity,
            postselected_fidelity: r.postselected_fidelity,
            waste_fraction: r.waste_fraction,
            corrected_fidelity: r.corrected_fidelity,
        }
    }
}

/// What one trial contributes to the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrialTally {
    pub weight: usize,
    pub baseline_ok: bool,
    pub accepted: bool,
    pub postselected_ok: bool,
    pub corrected_ok: bool,
    pub uncorrectable: bool,
}

impl TrialTally {
    /// Score a verified trial whose sampled pattern had `weight` events and
    /// `trivial` net effect.
    pub fn from_outcome(weight: usize, trivial: bool, outcome: &TrialOutcome) -> Self {
        let accepted = outcome.syndrome_unchanged();
        Self {
            weight,
            baseline_ok: trivial,
            accepted,
            postselected_ok: accepted && trivial,
            corrected_ok: outcome.success,
            uncorrectable: outcome.decode_result.classification == Classification::Uncorrectable,
        }
    }
}

/// Commutative accumulator for one sweep point.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accumulator {
    completed: usize,
    aborted: usize,
    baseline_ok: usize,
    accepted: usize,
    postselected_ok: usize,
    corrected_ok: usize,
    uncorrectable: usize,
    histogram: Vec<usize>,
}

impl Accumulator {
    pub fn record(&mut self, tally: TrialTally) {
        self.completed += 1;
        self.baseline_ok += usize::from(tally.baseline_ok);
        self.accepted += usize::from(tally.accepted);
        self.postselected_ok += usize::from(tally.postselected_ok);
        self.corrected_ok += usize::from(tally.corrected_ok);
        self.uncorrectable += usize::from(tally.uncorrectable);
        if self.histogram.len() <= tally.weight {
            self.histogram.resize(tally.weight + 1, 0);
        }
        self.histogram[tally.weight] += 1;
    }

    pub fn record_abort(&mut self) {
        self.aborted += 1;
    }

    pub fn finish(self, noise_level: f64, shots: usize, abandoned: bool) -> ExperimentResult {
        let status = if abandoned {
            RunStatus::Abandoned
        } else if self.aborted > 0 || self.completed < shots {
            RunStatus::Partial
        } else {
            RunStatus::Complete
        };

        ExperimentResult {
            noise_level,
            shots,
            baseline_fidelity: ratio(self.baseline_ok, self.completed),
            postselected_fidelity: ratio(self.postselected_ok, self.accepted),
            waste_fraction: ratio(self.completed - self.accepted, self.completed),
            corrected_fidelity: ratio(self.corrected_ok, self.completed),
            completed_trials: self.completed,
            aborted_trials: self.aborted,
            uncorrectable_trials: self.uncorrectable,
            accepted_trials: self.accepted,
            weight_histogram: self.histogram,
            status,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}
