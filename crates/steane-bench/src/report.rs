//! JSON export of a full benchmark run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ExperimentConfig;
use crate::error::BenchResult;
use crate::fit::ShotSweepReport;
use crate::memory::MemoryCurve;
use crate::result::{ExperimentRecord, ExperimentResult};

/// Current report schema.
pub const SCHEMA_VERSION: &str = "1.0";

/// Everything one benchmark run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub backend: String,
    pub seed: u64,
    pub config: ExperimentConfig,
    pub results: Vec<ExperimentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_sweep: Option<ShotSweepReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryCurve>,
}

impl BenchmarkReport {
    /// Report stamped with the current time.
    pub fn new(
        backend: impl Into<String>,
        config: ExperimentConfig,
        results: Vec<ExperimentResult>,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            backend: backend.into(),
            seed: config.seed,
            config,
            results,
            shot_sweep: None,
            memory: None,
        }
    }

    pub fn with_shot_sweep(mut self, sweep: ShotSweepReport) -> Self {
        self.shot_sweep = Some(sweep);
        self
    }

    pub fn with_memory(mut self, memory: MemoryCurve) -> Self {
        self.memory = Some(memory);
        self
    }

    /// The flat per-point records.
    pub fn records(&self) -> Vec<ExperimentRecord> {
        self.results.iter().map(ExperimentRecord::from).collect()
    }

    pub fn to_json(&self, pretty: bool) -> BenchResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write the pretty-printed report to `path`.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> BenchResult<()> {
        std::fs::write(path, self.to_json(true)?)?;
        Ok(())
    }
}
