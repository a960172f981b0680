//! Noise sweeps over independent correction cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{self, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use steane_code::{BlochAngles, ColorCode, ErrorModel};
use steane_hal::QecBackend;
use steane_pipeline::{PipelineResult, QecPipeline};
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, ExperimentConfig, FaultProfile};
use crate::error::BenchResult;
use crate::fit::ShotSweepReport;
use crate::result::{Accumulator, ExperimentResult, TrialTally};
use crate::seed::trial_seed;

/// Runs batches of trials and scores each one three ways.
///
/// Every trial gets its own pipeline and an RNG seeded from
/// `(seed, trial index)`. The same index draws the same random stream at
/// every noise level, so sweep points differ only through the noise level.
pub struct ExperimentDriver {
    backend: Arc<dyn QecBackend>,
    code: Arc<ColorCode>,
    faults: FaultProfile,
    angles: BlochAngles,
    concurrency: usize,
    max_consecutive_aborts: usize,
}

impl ExperimentDriver {
    /// Driver with the default fault profile, `|0>` and a window of 8.
    pub fn new(backend: Arc<dyn QecBackend>, code: Arc<ColorCode>) -> Self {
        Self {
            backend,
            code,
            faults: FaultProfile::default(),
            angles: BlochAngles::new(0.0, 0.0),
            concurrency: 8,
            max_consecutive_aborts: 16,
        }
    }

    /// Driver configured from a validated experiment configuration.
    pub fn from_config(
        backend: Arc<dyn QecBackend>,
        code: Arc<ColorCode>,
        config: &ExperimentConfig,
    ) -> BenchResult<Self> {
        config.validate()?;
        Ok(Self::new(backend, code)
            .with_faults(config.faults.clone())
            .with_angles(config.angles()?)
            .with_concurrency(config.execution.concurrency)
            .with_max_consecutive_aborts(config.execution.max_consecutive_aborts))
    }

    /// Set the fault profile.
    pub fn with_faults(mut self, faults: FaultProfile) -> Self {
        self.faults = faults;
        self
    }

    /// Set the initial state.
    pub fn with_angles(mut self, angles: BlochAngles) -> Self {
        self.angles = angles;
        self
    }

    /// Set how many trials run at once (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the abort streak that abandons a sweep point (at least 1).
    pub fn with_max_consecutive_aborts(mut self, max: usize) -> Self {
        self.max_consecutive_aborts = max.max(1);
        self
    }

    /// Run `shots_per_level` trials at each noise level, in order.
    ///
    /// Invalid parameters fail before any trial runs. An abandoned level
    /// is reported with its partial counts and the sweep moves on.
    #[instrument(skip(self, noise_levels), fields(backend = self.backend.name(), levels = noise_levels.len()))]
    pub async fn run(
        &self,
        noise_levels: &[f64],
        shots_per_level: usize,
        seed: u64,
    ) -> BenchResult<Vec<ExperimentResult>> {
        if shots_per_level == 0 {
            return Err(ConfigError::Validation("shots_per_level must be at least 1".into()).into());
        }
        let models = noise_levels
            .iter()
            .map(|&p| self.faults.model_at(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(models.len());
        for model in &models {
            results.push(self.run_point(model, shots_per_level, seed).await);
        }
        Ok(results)
    }

    /// Run a fixed-noise sweep over `shot_counts` and fit each strategy's
    /// error rate against N.
    ///
    /// Each shot count gets its own derived seed.
    #[instrument(skip(self, shot_counts), fields(backend = self.backend.name()))]
    pub async fn run_shot_sweep(
        &self,
        noise_level: f64,
        shot_counts: &[usize],
        seed: u64,
    ) -> BenchResult<ShotSweepReport> {
        if shot_counts.contains(&0) {
            return Err(ConfigError::Validation("shot counts must be positive".into()).into());
        }
        let model = self.faults.model_at(noise_level)?;

        let mut points = Vec::with_capacity(shot_counts.len());
        for &shots in shot_counts {
            let point_seed = trial_seed(seed, shots as u64);
            points.push(self.run_point(&model, shots, point_seed).await);
        }
        Ok(ShotSweepReport::from_points(noise_level, points))
    }

    async fn run_point(&self, model: &ErrorModel, shots: usize, seed: u64) -> ExperimentResult {
        let noise = model.noise_probability();

        match self.backend.availability().await {
            Ok(availability) if availability.is_available => {}
            Ok(availability) => {
                warn!(
                    noise,
                    status = availability.status_message.as_deref().unwrap_or("unavailable"),
                    "backend unavailable, abandoning sweep point"
                );
                return Accumulator::default().finish(noise, shots, true);
            }
            Err(e) => {
                warn!(noise, error = %e, "availability check failed, abandoning sweep point");
                return Accumulator::default().finish(noise, shots, true);
            }
        }

        // Once set, trials not yet started are skipped. Trials already in
        // flight still run to completion so their blocks get released.
        let stop = AtomicBool::new(false);
        let mut trials = stream::iter(0..shots as u64)
            .map(|index| {
                let stop = &stop;
                async move {
                    if stop.load(Ordering::Acquire) {
                        return None;
                    }
                    Some(self.run_trial(model, trial_seed(seed, index)).await)
                }
            })
            .buffer_unordered(self.concurrency);

        let mut acc = Accumulator::default();
        let mut streak = 0;
        let mut abandoned = false;
        while let Some(trial) = trials.next().await {
            let Some(trial) = trial else { continue };
            match trial {
                Ok(tally) => {
                    streak = 0;
                    acc.record(tally);
                }
                Err(e) => {
                    warn!(noise, error = %e, "trial aborted");
                    acc.record_abort();
                    streak += 1;
                    if !abandoned && streak >= self.max_consecutive_aborts {
                        warn!(noise, streak, "too many consecutive aborts, abandoning sweep point");
                        abandoned = true;
                        stop.store(true, Ordering::Release);
                    }
                }
            }
        }

        let result = acc.finish(noise, shots, abandoned);
        info!(
            noise,
            shots,
            baseline = result.baseline_fidelity,
            postselected = result.postselected_fidelity,
            waste = result.waste_fraction,
            corrected = result.corrected_fidelity,
            aborted = result.aborted_trials,
            status = %result.status,
            "sweep point finished"
        );
        result
    }

    async fn run_trial(&self, model: &ErrorModel, seed: u64) -> PipelineResult<TrialTally> {
        let pattern = model.sample_pattern(&mut StdRng::seed_from_u64(seed))?;

        let mut pipeline = QecPipeline::new(self.backend.clone(), self.code.clone());
        let outcome = pipeline.run_cycle(self.angles, &pattern).await;
        if let Err(e) = pipeline.release().await {
            debug!(error = %e, "release failed");
        }

        let outcome = outcome?;
        Ok(TrialTally::from_outcome(
            pattern.weight(),
            pattern.is_trivial(),
            &outcome,
        ))
    }
}

impl std::fmt::Debug for ExperimentDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExperimentDriver")
            .field("backend", &self.backend.name())
            .field("faults", &self.faults)
            .field("angles", &self.angles)
            .field("concurrency", &self.concurrency)
            .field("max_consecutive_aborts", &self.max_consecutive_aborts)
            .finish_non_exhaustive()
    }
}
