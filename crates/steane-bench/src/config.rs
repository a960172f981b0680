//! Experiment configuration.
//!
//! Supports loading configuration from:
//! 1. Built-in defaults matching the reference benchmark
//! 2. A YAML file
//! 3. Environment variables (with `STEANE_` prefix)
//!
//! Later sources override earlier ones, and [`ExperimentConfig::validate`]
//! runs before any trial.

use serde::{Deserialize, Serialize};
use std::path::Path;
use steane_code::{
    BlochAngles, CodeError, DEFAULT_MAX_FAULTS, DEFAULT_SUPPRESSION, ErrorModel, LogicalState,
    check_probability,
};
use thiserror::Error;

/// Complete experiment configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Master RNG seed.
    pub seed: u64,
    /// Initial logical state.
    pub state: StateSpec,
    /// Noise sweep.
    pub sweep: SweepConfig,
    /// How faults are drawn per trial.
    pub faults: FaultProfile,
    /// Shot-count sweep used for power-law fitting.
    pub power_law: PowerLawConfig,
    /// Multi-round memory experiment.
    pub memory: MemoryConfig,
    /// Scheduling limits.
    pub execution: ExecutionConfig,
}

/// Initial state, by name or by angles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateSpec {
    /// A canonical state name such as `"|0>"` or `"plus"`.
    Named(String),
    /// Explicit Bloch angles.
    Angles {
        /// Polar angle.
        theta: f64,
        /// Azimuthal angle.
        phi: f64,
    },
}

impl StateSpec {
    /// Resolve to encoding angles.
    pub fn angles(&self) -> Result<BlochAngles, ConfigError> {
        match self {
            StateSpec::Named(name) => name
                .parse::<LogicalState>()
                .map(LogicalState::angles)
                .map_err(|e| ConfigError::Validation(e.to_string())),
            StateSpec::Angles { theta, phi } => Ok(BlochAngles::new(*theta, *phi)),
        }
    }
}

impl Default for StateSpec {
    fn default() -> Self {
        StateSpec::Named(LogicalState::Zero.ket().to_string())
    }
}

impl From<LogicalState> for StateSpec {
    fn from(state: LogicalState) -> Self {
        StateSpec::Named(state.ket().to_string())
    }
}

/// Noise levels and shots of the main sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Per-trial fault probabilities, in run order.
    pub noise_levels: Vec<f64>,
    /// Trials per noise level.
    pub shots_per_level: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            noise_levels: vec![0.0, 0.05, 0.25, 0.60],
            shots_per_level: 1000,
        }
    }
}

/// Fault sampler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// At most one fault per trial.
    SingleQubit,
    /// Geometrically suppressed multi-fault cascade.
    Cascade,
}

/// Fault profile shared by all sweeps; the noise level comes from the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultProfile {
    /// Sampler family.
    pub kind: FaultKind,
    /// Cascade suppression factor.
    pub suppression: f64,
    /// Cascade fault cap.
    pub max_faults: usize,
}

impl FaultProfile {
    /// Single-fault profile.
    pub fn single_qubit() -> Self {
        Self {
            kind: FaultKind::SingleQubit,
            ..Self::default()
        }
    }

    /// The error model of this profile at noise level `p`.
    pub fn model_at(&self, p: f64) -> steane_code::CodeResult<ErrorModel> {
        match self.kind {
            FaultKind::SingleQubit => ErrorModel::single_qubit(p),
            FaultKind::Cascade => ErrorModel::cascade(p, self.suppression, self.max_faults),
        }
    }
}

impl Default for FaultProfile {
    fn default() -> Self {
        Self {
            kind: FaultKind::Cascade,
            suppression: DEFAULT_SUPPRESSION,
            max_faults: DEFAULT_MAX_FAULTS,
        }
    }
}

/// Shot-count sweep at fixed noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerLawConfig {
    /// Fixed noise level.
    pub noise_level: f64,
    /// Shot counts to run.
    pub shot_counts: Vec<usize>,
}

impl Default for PowerLawConfig {
    fn default() -> Self {
        Self {
            noise_level: 0.5,
            shot_counts: vec![5, 10, 20, 40, 80, 150],
        }
    }
}

/// Multi-round memory experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Number of correction rounds.
    pub rounds: usize,
    /// Per-round fault probability.
    pub noise_level: f64,
    /// Independent trajectories.
    pub shots: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            rounds: 10,
            noise_level: 0.25,
            shots: 200,
        }
    }
}

/// Scheduling limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Trials in flight at once.
    pub concurrency: usize,
    /// Abandon a sweep point after this many aborted trials in a row.
    pub max_consecutive_aborts: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            max_consecutive_aborts: 16,
        }
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            state: StateSpec::default(),
            sweep: SweepConfig::default(),
            faults: FaultProfile::default(),
            power_law: PowerLawConfig::default(),
            memory: MemoryConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Parse a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided, defaults otherwise
    /// 2. Apply environment variable overrides
    /// 3. Validate
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `STEANE_*` overrides read through `lookup`.
    ///
    /// Only variables that are set override; an unparsable value is an
    /// error rather than being ignored.
    pub fn merge_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("STEANE_SEED") {
            self.seed = parse_env("STEANE_SEED", &v)?;
        }
        if let Some(v) = lookup("STEANE_SHOTS") {
            self.sweep.shots_per_level = parse_env("STEANE_SHOTS", &v)?;
        }
        if let Some(v) = lookup("STEANE_CONCURRENCY") {
            self.execution.concurrency = parse_env("STEANE_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("STEANE_NOISE_LEVELS") {
            self.sweep.noise_levels = v
                .split(',')
                .map(|item| parse_env("STEANE_NOISE_LEVELS", item))
                .collect::<Result<_, _>>()?;
        }
        Ok(self)
    }

    /// Resolved initial-state angles.
    pub fn angles(&self) -> Result<BlochAngles, ConfigError> {
        self.state.angles()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let angles = self.angles()?;
        if !angles.is_finite() {
            return Err(ConfigError::Validation(format!(
                "initial state angles must be finite, got {angles}"
            )));
        }

        if self.sweep.noise_levels.is_empty() {
            return Err(ConfigError::Validation(
                "sweep.noise_levels must not be empty".into(),
            ));
        }
        for &p in &self.sweep.noise_levels {
            check_probability("sweep.noise_levels", p)?;
        }
        if self.sweep.shots_per_level == 0 {
            return Err(ConfigError::Validation(
                "sweep.shots_per_level must be at least 1".into(),
            ));
        }

        // Surfaces a bad suppression factor.
        self.faults.model_at(0.0)?;
        if self.faults.kind == FaultKind::Cascade && self.faults.max_faults == 0 {
            return Err(ConfigError::Validation(
                "faults.max_faults must be at least 1 for a cascade".into(),
            ));
        }

        check_probability("power_law.noise_level", self.power_law.noise_level)?;
        if self.power_law.shot_counts.is_empty() || self.power_law.shot_counts.contains(&0) {
            return Err(ConfigError::Validation(
                "power_law.shot_counts must be non-empty and positive".into(),
            ));
        }

        check_probability("memory.noise_level", self.memory.noise_level)?;
        if self.memory.rounds == 0 || self.memory.shots == 0 {
            return Err(ConfigError::Validation(
                "memory.rounds and memory.shots must be at least 1".into(),
            ));
        }

        if self.execution.concurrency == 0 {
            return Err(ConfigError::Validation(
                "execution.concurrency must be at least 1".into(),
            ));
        }
        if self.execution.max_consecutive_aborts == 0 {
            return Err(ConfigError::Validation(
                "execution.max_consecutive_aborts must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },

    #[error(transparent)]
    Code(#[from] CodeError),
}
