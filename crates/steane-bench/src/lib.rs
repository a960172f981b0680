//! Steane Benchmarks
//!
//! Statistical characterization of the [[7,1,3]] correction cycle under
//! noise. Each trial samples one fault pattern and scores it three ways:
//!
//! - **Baseline**: no recovery; correct iff the net fault is the identity
//! - **Postselected**: keep only trials whose syndrome did not move
//! - **Corrected**: the full decode-and-correct cycle
//!
//! On top of the noise sweep this crate fits power laws over shot-count
//! sweeps and runs a multi-round memory experiment.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use steane_adapter_sim::SimulatorBackend;
//! use steane_bench::ExperimentDriver;
//! use steane_code::ColorCode;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = ExperimentDriver::new(
//!     Arc::new(SimulatorBackend::seeded(1)?),
//!     Arc::new(ColorCode::steane()?),
//! );
//! for r in driver.run(&[0.0, 0.05, 0.25], 500, 42).await? {
//!     println!("p={} corrected={:.3}", r.noise_level, r.corrected_fidelity);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod fit;
pub mod memory;
pub mod report;
pub mod result;
pub mod seed;

pub use config::{
    ConfigError, ExecutionConfig, ExperimentConfig, FaultKind, FaultProfile, MemoryConfig,
    PowerLawConfig, StateSpec, SweepConfig,
};
pub use driver::ExperimentDriver;
pub use error::{BenchError, BenchResult};
pub use fit::{PowerLawFit, ShotSweepReport, fit_power_law};
pub use memory::{MemoryCurve, MultiRoundMemory};
pub use report::{BenchmarkReport, SCHEMA_VERSION};
pub use result::{ExperimentRecord, ExperimentResult, RunStatus};
pub use seed::trial_seed;
