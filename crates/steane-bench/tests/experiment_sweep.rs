//! Sweep-level behaviour of the experiment driver and memory runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use steane_adapter_sim::{SimulatorBackend, SimulatorConfig};
use steane_bench::{
    BenchmarkReport, ExperimentConfig, ExperimentDriver, FaultProfile, MultiRoundMemory,
    RunStatus,
};
use steane_code::{Basis, BlochAngles, ColorCode, LogicalState, Measurement, Pauli};
use steane_hal::{BackendAvailability, HalResult, QecBackend, StateHandle};

fn code() -> Arc<ColorCode> {
    Arc::new(ColorCode::steane().unwrap())
}

fn sim(seed: u64) -> Arc<SimulatorBackend> {
    Arc::new(SimulatorBackend::seeded(seed).unwrap())
}

#[tokio::test]
async fn test_noiseless_ceiling_for_every_state() {
    for state in LogicalState::ALL {
        let driver = ExperimentDriver::new(sim(1), code()).with_angles(state.angles());
        let r = &driver.run(&[0.0], 40, 3).await.unwrap()[0];
        assert_eq!(r.baseline_fidelity, 1.0, "{state}");
        assert_eq!(r.postselected_fidelity, 1.0, "{state}");
        assert_eq!(r.corrected_fidelity, 1.0, "{state}");
        assert_eq!(r.waste_fraction, 0.0, "{state}");
        assert_eq!(r.accepted_trials, 40);
    }
}

#[tokio::test]
async fn test_single_fault_sweep_statistics() {
    let levels = [0.0, 0.05, 0.25, 0.6, 1.0];
    let driver =
        ExperimentDriver::new(sim(2), code()).with_faults(FaultProfile::single_qubit());
    let results = driver.run(&levels, 400, 17).await.unwrap();

    assert_eq!(results.len(), levels.len());
    for pair in results.windows(2) {
        assert!(pair[1].waste_fraction >= pair[0].waste_fraction);
    }
    for r in &results {
        assert_eq!(r.status, RunStatus::Complete);
        // Every single fault is detected and corrected.
        assert_eq!(r.corrected_fidelity, 1.0);
        assert_eq!(r.uncorrectable_trials, 0);
        assert!((r.waste_fraction - (1.0 - r.baseline_fidelity)).abs() < 1e-12);
        if r.accepted_trials > 0 {
            assert_eq!(r.postselected_fidelity, 1.0);
        }
    }
    assert_eq!(results[4].waste_fraction, 1.0);
    assert_eq!(results[4].postselected_fidelity, 0.0);
}

#[tokio::test]
async fn test_cascade_faults_show_up_in_histogram() {
    let driver = ExperimentDriver::new(sim(3), code());
    let r = &driver.run(&[0.6], 500, 5).await.unwrap()[0];

    assert_eq!(r.weight_histogram.iter().sum::<usize>(), r.completed_trials);
    assert!(r.weight_histogram.len() >= 3);
    assert!(r.uncorrectable_trials > 0);
    assert!(r.corrected_fidelity < 1.0);
    assert!(r.corrected_fidelity > r.baseline_fidelity);
}

#[tokio::test]
async fn test_same_seed_replays_exactly() {
    let a = ExperimentDriver::new(sim(4), code())
        .run(&[0.25], 200, 99)
        .await
        .unwrap();
    let b = ExperimentDriver::new(sim(5), code())
        .with_concurrency(3)
        .run(&[0.25], 200, 99)
        .await
        .unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_measurement_failures_counted_as_aborts() {
    // Six probes per trial: with one trial in flight every second trial
    // fails on its last probe.
    let backend = Arc::new(
        SimulatorBackend::with_config(SimulatorConfig {
            seed: Some(6),
            fail_every_nth_measurement: Some(12),
            ..SimulatorConfig::default()
        })
        .unwrap(),
    );
    let driver = ExperimentDriver::new(backend.clone(), code()).with_concurrency(1);
    let r = &driver.run(&[0.0], 10, 1).await.unwrap()[0];

    assert_eq!(r.status, RunStatus::Partial);
    assert_eq!(r.completed_trials, 5);
    assert_eq!(r.aborted_trials, 5);
    assert_eq!(r.corrected_fidelity, 1.0);
    assert_eq!(backend.live_states(), 0);
}

#[tokio::test]
async fn test_abort_streak_abandons_point() {
    let backend = Arc::new(
        SimulatorBackend::with_config(SimulatorConfig {
            seed: Some(7),
            fail_every_nth_measurement: Some(1),
            ..SimulatorConfig::default()
        })
        .unwrap(),
    );
    let driver = ExperimentDriver::new(backend, code())
        .with_concurrency(1)
        .with_max_consecutive_aborts(3);
    let results = driver.run(&[0.0, 0.1], 20, 1).await.unwrap();

    for r in &results {
        assert_eq!(r.status, RunStatus::Abandoned);
        assert_eq!(r.aborted_trials, 3);
        assert_eq!(r.completed_trials, 0);
        assert_eq!(r.corrected_fidelity, 0.0);
    }
}

#[tokio::test]
async fn test_unavailable_backend_abandons_without_trials() {
    let backend = sim(8);
    backend.set_available(false);
    let driver = ExperimentDriver::new(backend.clone(), code());
    let r = &driver.run(&[0.1], 50, 1).await.unwrap()[0];

    assert_eq!(r.status, RunStatus::Abandoned);
    assert_eq!(r.completed_trials + r.aborted_trials, 0);
    assert_eq!(backend.measurement_count(), 0);
}

/// Simulator that reports itself offline from the `offline_after`-th
/// availability check on.
struct GoesOffline {
    inner: SimulatorBackend,
    checks: AtomicUsize,
    offline_after: usize,
}

#[async_trait]
impl QecBackend for GoesOffline {
    fn name(&self) -> &str {
        "goes_offline"
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        let check = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        if check >= self.offline_after {
            Ok(BackendAvailability::unavailable("maintenance window"))
        } else {
            self.inner.availability().await
        }
    }

    async fn encode(&self, theta: f64, phi: f64) -> HalResult<StateHandle> {
        self.inner.encode(theta, phi).await
    }

    async fn inject_fault(&self, h: &StateHandle, qubit: usize, pauli: Pauli) -> HalResult<()> {
        self.inner.inject_fault(h, qubit, pauli).await
    }

    async fn measure(&self, h: &StateHandle, basis: Basis) -> HalResult<Measurement> {
        self.inner.measure(h, basis).await
    }

    async fn apply_correction(&self, h: &StateHandle, qubit: usize, pauli: Pauli) -> HalResult<()> {
        self.inner.apply_correction(h, qubit, pauli).await
    }

    async fn release(&self, h: &StateHandle) -> HalResult<()> {
        self.inner.release(h).await
    }
}

#[tokio::test]
async fn test_earlier_points_survive_later_outage() {
    let backend = Arc::new(GoesOffline {
        inner: SimulatorBackend::seeded(9).unwrap(),
        checks: AtomicUsize::new(0),
        offline_after: 3,
    });
    let driver = ExperimentDriver::new(backend, code());
    let results = driver.run(&[0.0, 0.05, 0.25], 30, 2).await.unwrap();

    assert_eq!(results[0].status, RunStatus::Complete);
    assert_eq!(results[0].corrected_fidelity, 1.0);
    assert_eq!(results[1].status, RunStatus::Complete);
    assert_eq!(results[1].completed_trials, 30);
    assert_eq!(results[2].status, RunStatus::Abandoned);
    assert_eq!(results[2].noise_level, 0.25);
}

/// Simulator that yields to the executor around every block operation, so
/// concurrent trials interleave mid-cycle.
struct Yielding {
    inner: Arc<SimulatorBackend>,
}

#[async_trait]
impl QecBackend for Yielding {
    fn name(&self) -> &str {
        "yielding"
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        self.inner.availability().await
    }

    async fn encode(&self, theta: f64, phi: f64) -> HalResult<StateHandle> {
        tokio::task::yield_now().await;
        self.inner.encode(theta, phi).await
    }

    async fn inject_fault(&self, h: &StateHandle, qubit: usize, pauli: Pauli) -> HalResult<()> {
        self.inner.inject_fault(h, qubit, pauli).await
    }

    async fn measure(&self, h: &StateHandle, basis: Basis) -> HalResult<Measurement> {
        tokio::task::yield_now().await;
        self.inner.measure(h, basis).await
    }

    async fn apply_correction(&self, h: &StateHandle, qubit: usize, pauli: Pauli) -> HalResult<()> {
        self.inner.apply_correction(h, qubit, pauli).await
    }

    async fn release(&self, h: &StateHandle) -> HalResult<()> {
        tokio::task::yield_now().await;
        self.inner.release(h).await
    }
}

#[tokio::test]
async fn test_abandoned_point_releases_in_flight_trials() {
    let inner = Arc::new(
        SimulatorBackend::with_config(SimulatorConfig {
            seed: Some(12),
            fail_every_nth_measurement: Some(1),
            ..SimulatorConfig::default()
        })
        .unwrap(),
    );
    let backend = Arc::new(Yielding {
        inner: inner.clone(),
    });
    let driver = ExperimentDriver::new(backend, code())
        .with_concurrency(8)
        .with_max_consecutive_aborts(2);
    let r = &driver.run(&[0.1], 100, 1).await.unwrap()[0];

    assert_eq!(r.status, RunStatus::Abandoned);
    assert!(r.aborted_trials >= 2);
    assert!(r.aborted_trials < 100);
    assert_eq!(r.completed_trials, 0);
    assert_eq!(inner.live_states(), 0);
}

#[tokio::test]
async fn test_shot_sweep_fits_every_strategy() {
    let driver = ExperimentDriver::new(sim(10), code());
    let report = driver
        .run_shot_sweep(0.5, &[5, 10, 20, 40, 80, 150], 42)
        .await
        .unwrap();

    let shots: Vec<usize> = report.points.iter().map(|r| r.shots).collect();
    assert_eq!(shots, vec![5, 10, 20, 40, 80, 150]);

    let baseline = report.baseline.unwrap();
    assert!(baseline.b.is_finite());
    assert!(baseline.points_used >= 2);
    assert!(baseline.r_squared <= 1.0 + 1e-12);
}

/// Individual sweeps are noisy at these shot counts, so the ordering of the
/// fitted exponents is checked as a majority over a block of seeds.
#[tokio::test]
async fn test_corrected_error_decays_faster_than_baseline() {
    let shot_counts = [5, 10, 20, 40, 80, 150];
    let mut faster = 0;
    for seed in 0..20 {
        let report = ExperimentDriver::new(sim(seed), code())
            .run_shot_sweep(0.5, &shot_counts, seed)
            .await
            .unwrap();
        if let (Some(baseline), Some(corrected)) = (report.baseline, report.corrected) {
            if corrected.b < baseline.b {
                faster += 1;
            }
        }
    }
    assert!(faster > 10, "corrected exponent lower in only {faster}/20 sweeps");
}

#[tokio::test]
async fn test_memory_excludes_aborted_trajectories() {
    let backend = Arc::new(
        SimulatorBackend::with_config(SimulatorConfig {
            seed: Some(11),
            fail_every_nth_measurement: Some(1),
            ..SimulatorConfig::default()
        })
        .unwrap(),
    );
    let curve = MultiRoundMemory::new(backend, code(), 1)
        .run_curve(BlochAngles::new(0.0, 0.0), 4, 0.2, 10)
        .await
        .unwrap();

    assert_eq!(curve.aborted_trajectories, 10);
    assert_eq!(curve.completed_trajectories, 0);
    assert_eq!(curve.survival, vec![0.0; 4]);
}

#[tokio::test]
async fn test_config_driven_report() {
    let yaml = r#"
seed: 5
state: plus
sweep:
  noise_levels: [0.0, 0.25]
  shots_per_level: 50
power_law:
  noise_level: 0.5
  shot_counts: [10, 20, 40]
memory:
  rounds: 3
  noise_level: 0.1
  shots: 20
"#;
    let config = ExperimentConfig::from_yaml(yaml).unwrap();
    let backend = sim(12);
    let driver = ExperimentDriver::from_config(backend.clone(), code(), &config).unwrap();

    let results = driver
        .run(&config.sweep.noise_levels, config.sweep.shots_per_level, config.seed)
        .await
        .unwrap();
    let sweep = driver
        .run_shot_sweep(
            config.power_law.noise_level,
            &config.power_law.shot_counts,
            config.seed,
        )
        .await
        .unwrap();
    let memory = MultiRoundMemory::from_config(backend.clone(), code(), &config)
        .run_curve(
            config.angles().unwrap(),
            config.memory.rounds,
            config.memory.noise_level,
            config.memory.shots,
        )
        .await
        .unwrap();

    let report = BenchmarkReport::new(backend.name(), config, results)
        .with_shot_sweep(sweep)
        .with_memory(memory);
    assert_eq!(report.records().len(), 2);
    assert_eq!(report.records()[0].baseline_fidelity, 1.0);

    let json: serde_json::Value = serde_json::from_str(&report.to_json(true).unwrap()).unwrap();
    assert_eq!(json["seed"], 5);
    assert_eq!(json["results"][1]["noise_level"], 0.25);
    assert_eq!(json["memory"]["survival"].as_array().unwrap().len(), 3);
}
