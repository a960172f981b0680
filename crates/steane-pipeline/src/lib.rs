//! Steane QEC Pipeline
//!
//! The state machine that drives one quantum error-correction cycle on a
//! [`QecBackend`](steane_hal::QecBackend):
//!
//! 1. **encode** the logical state `(theta, phi)`
//! 2. **measure baseline** syndromes on the fault-free block
//! 3. **inject** a fault pattern (possibly empty)
//! 4. **measure post-error** syndromes and compute the deltas
//! 5. **decode** the deltas into a [`DecodeResult`](steane_code::DecodeResult)
//! 6. **correct** a correctable fault, skip an uncorrectable one
//! 7. **verify** that the syndromes are back to baseline
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use steane_adapter_sim::SimulatorBackend;
//! use steane_code::{ColorCode, ErrorModel, LogicalState, Pauli};
//! use steane_pipeline::QecPipeline;
//!
//! let backend = Arc::new(SimulatorBackend::seeded(7)?);
//! let mut pipeline = QecPipeline::new(backend, Arc::new(ColorCode::steane()?));
//!
//! let fault = ErrorModel::inject(4, Pauli::Y)?;
//! let outcome = pipeline
//!     .run_cycle(LogicalState::Zero.angles(), &fault.into())
//!     .await?;
//! assert!(outcome.success);
//! ```

pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod state;

pub use error::{PipelineError, PipelineResult};
pub use outcome::{CorrectionAction, TrialOutcome};
pub use pipeline::QecPipeline;
pub use state::PipelineState;
