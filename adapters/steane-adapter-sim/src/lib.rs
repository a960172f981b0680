//! Steane Pauli-Frame Simulator
//!
//! A [`QecBackend`](steane_hal::QecBackend) that tracks the net Pauli applied
//! to each encoded block instead of a full statevector. That is exact for
//! everything the QEC control plane observes: stabilizer parities depend only
//! on the X and Z components of the accumulated fault.
//!
//! # Features
//!
//! - **Configurable baseline**: fault-free stabilizer signs per basis
//! - **Shot noise**: every probe outcome is masked by a random codeword, so
//!   raw bit-strings differ between shots while parities do not
//! - **Failure injection**: availability toggling and every-n-th
//!   measurement failure
//! - **Introspection**: residual frame, live handle count, call counters
//!
//! # Example
//!
//! ```ignore
//! use steane_adapter_sim::SimulatorBackend;
//! use steane_hal::{Pauli, QecBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::seeded(7)?;
//!
//!     let handle = backend.encode(0.0, 0.0).await?;
//!     backend.inject_fault(&handle, 4, Pauli::Y).await?;
//!     backend.apply_correction(&handle, 4, Pauli::Y).await?;
//!
//!     assert!(backend.residual_frame(&handle)?.is_identity());
//!     Ok(())
//! }
//! ```

mod frame;
mod simulator;

pub use frame::PauliFrame;
pub use simulator::{SimulatorBackend, SimulatorConfig};
