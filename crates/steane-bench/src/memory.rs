//! Multi-round memory experiment.
//!
//! One encoded block per trajectory is corrected round after round, always
//! against the syndrome measured right after encoding. The first round that
//! fails verification ends the trajectory.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use steane_code::{BlochAngles, ColorCode, ErrorModel};
use steane_hal::QecBackend;
use steane_pipeline::{PipelineResult, QecPipeline};
use tracing::{debug, info, instrument, warn};

use crate::config::{ConfigError, ExperimentConfig, FaultProfile};
use crate::error::BenchResult;
use crate::seed::trial_seed;

/// Survival curve of a memory run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCurve {
    pub noise_level: f64,
    pub rounds: usize,
    pub shots: usize,
    /// `survival[k]` is the fraction of trajectories alive after `k + 1`
    /// rounds.
    pub survival: Vec<f64>,
    pub completed_trajectories: usize,
    pub aborted_trajectories: usize,
}

/// Repeats correction cycles on persistent encoded blocks.
pub struct MultiRoundMemory {
    backend: Arc<dyn QecBackend>,
    code: Arc<ColorCode>,
    faults: FaultProfile,
    seed: u64,
    concurrency: usize,
}

impl MultiRoundMemory {
    pub fn new(backend: Arc<dyn QecBackend>, code: Arc<ColorCode>, seed: u64) -> Self {
        Self {
            backend,
            code,
            faults: FaultProfile::default(),
            seed,
            concurrency: 8,
        }
    }

    pub fn from_config(
        backend: Arc<dyn QecBackend>,
        code: Arc<ColorCode>,
        config: &ExperimentConfig,
    ) -> Self {
        Self::new(backend, code, config.seed)
            .with_faults(config.faults.clone())
            .with_concurrency(config.execution.concurrency)
    }

    pub fn with_faults(mut self, faults: FaultProfile) -> Self {
        self.faults = faults;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Survival probability after each of `rounds` rounds.
    pub async fn run(
        &self,
        theta: f64,
        phi: f64,
        rounds: usize,
        noise_probability: f64,
        shots: usize,
    ) -> BenchResult<Vec<f64>> {
        let curve = self
            .run_curve(BlochAngles::new(theta, phi), rounds, noise_probability, shots)
            .await?;
        Ok(curve.survival)
    }

    /// Like [`run`](Self::run) but keeps the trajectory counts.
    ///
    /// Trajectories stopped by a backend failure are left out of every
    /// round's denominator.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub async fn run_curve(
        &self,
        angles: BlochAngles,
        rounds: usize,
        noise_probability: f64,
        shots: usize,
    ) -> BenchResult<MemoryCurve> {
        if rounds == 0 || shots == 0 {
            return Err(
                ConfigError::Validation("rounds and shots must be at least 1".into()).into(),
            );
        }
        if !angles.is_finite() {
            return Err(ConfigError::Validation(format!("non-finite angles {angles}")).into());
        }
        let model = self.faults.model_at(noise_probability)?;

        let lifetimes: Vec<PipelineResult<usize>> = stream::iter(0..shots as u64)
            .map(|index| self.run_trajectory(angles, rounds, &model, trial_seed(self.seed, index)))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut alive = vec![0usize; rounds];
        let mut completed = 0;
        let mut aborted = 0;
        for lifetime in lifetimes {
            match lifetime {
                Ok(survived) => {
                    completed += 1;
                    for slot in alive.iter_mut().take(survived) {
                        *slot += 1;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "trajectory aborted");
                    aborted += 1;
                }
            }
        }

        let survival: Vec<f64> = alive
            .iter()
            .map(|&n| if completed == 0 { 0.0 } else { n as f64 / completed as f64 })
            .collect();

        info!(
            noise = noise_probability,
            rounds,
            completed,
            aborted,
            final_survival = survival.last().copied().unwrap_or(0.0),
            "memory run finished"
        );

        Ok(MemoryCurve {
            noise_level: noise_probability,
            rounds,
            shots,
            survival,
            completed_trajectories: completed,
            aborted_trajectories: aborted,
        })
    }

    /// Rounds survived by one trajectory.
    async fn run_trajectory(
        &self,
        angles: BlochAngles,
        rounds: usize,
        model: &ErrorModel,
        seed: u64,
    ) -> PipelineResult<usize> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pipeline = QecPipeline::new(self.backend.clone(), self.code.clone());

        let survived = Self::drive(&mut pipeline, angles, rounds, model, &mut rng).await;
        if let Err(e) = pipeline.release().await {
            debug!(error = %e, "release failed");
        }
        survived
    }

    async fn drive(
        pipeline: &mut QecPipeline,
        angles: BlochAngles,
        rounds: usize,
        model: &ErrorModel,
        rng: &mut StdRng,
    ) -> PipelineResult<usize> {
        let handle = pipeline.encode(angles.theta, angles.phi).await?;
        let baseline = pipeline.measure_baseline().await?;

        for round in 0..rounds {
            if round > 0 {
                pipeline.resume(handle, baseline)?;
            }
            let pattern = model.sample_pattern(rng)?;
            pipeline.inject_pattern(&pattern).await?;
            pipeline.measure_post_error().await?;
            pipeline.decode()?;
            pipeline.correct().await?;
            if !pipeline.verify().await?.success {
                debug!(round, "trajectory lost");
                return Ok(round);
            }
        }
        Ok(rounds)
    }
}

impl std::fmt::Debug for MultiRoundMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiRoundMemory")
            .field("backend", &self.backend.name())
            .field("faults", &self.faults)
            .field("seed", &self.seed)
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steane_adapter_sim::SimulatorBackend;

    fn memory(seed: u64) -> MultiRoundMemory {
        MultiRoundMemory::new(
            Arc::new(SimulatorBackend::seeded(seed).unwrap()),
            Arc::new(ColorCode::steane().unwrap()),
            seed,
        )
    }

    #[tokio::test]
    async fn test_noiseless_memory_survives() {
        let survival = memory(1).run(0.0, 0.0, 5, 0.0, 20).await.unwrap();
        assert_eq!(survival, vec![1.0; 5]);
    }

    #[tokio::test]
    async fn test_single_faults_are_always_corrected() {
        // Every round's single fault is corrected, so nothing is lost.
        let survival = memory(2)
            .with_faults(FaultProfile::single_qubit())
            .run(0.0, 0.0, 6, 1.0, 30)
            .await
            .unwrap();
        assert_eq!(survival, vec![1.0; 6]);
    }

    #[tokio::test]
    async fn test_survival_never_increases() {
        let curve = memory(3)
            .run_curve(BlochAngles::new(0.0, 0.0), 8, 0.9, 100)
            .await
            .unwrap();
        assert_eq!(curve.survival.len(), 8);
        assert!(curve.survival.windows(2).all(|w| w[1] <= w[0]));
        assert!(curve.survival[7] < 1.0);
        assert_eq!(curve.completed_trajectories, 100);
    }

    #[tokio::test]
    async fn test_zero_rounds_rejected() {
        assert!(memory(4).run(0.0, 0.0, 0, 0.1, 10).await.is_err());
    }
}
