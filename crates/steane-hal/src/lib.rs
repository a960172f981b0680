//! Steane Hardware Abstraction Layer
//!
//! This crate defines how the QEC control plane talks to whatever actually
//! holds the encoded qubit: a simulator, or a hardware execution service.
//!
//! # Overview
//!
//! - A common [`QecBackend`] trait for encoding, fault injection, probe
//!   measurement and correction
//! - [`StateHandle`] as the opaque reference to a prepared block
//! - [`BackendAvailability`] for liveness checks before a sweep starts
//! - [`HalError`] for collaborator-side failures
//!
//! # Implementing a Custom Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use steane_hal::{
//!     BackendAvailability, Basis, HalResult, Measurement, Pauli, QecBackend, StateHandle,
//! };
//!
//! struct MyBackend;
//!
//! #[async_trait]
//! impl QecBackend for MyBackend {
//!     fn name(&self) -> &str { "my_backend" }
//!
//!     async fn availability(&self) -> HalResult<BackendAvailability> {
//!         Ok(BackendAvailability::always_available())
//!     }
//!
//!     async fn encode(&self, theta: f64, phi: f64) -> HalResult<StateHandle> {
//!         // Prepare the logical state
//!         # todo!()
//!     }
//!
//!     async fn inject_fault(&self, h: &StateHandle, q: usize, p: Pauli) -> HalResult<()> {
//!         # todo!()
//!     }
//!
//!     async fn measure(&self, h: &StateHandle, basis: Basis) -> HalResult<Measurement> {
//!         // Run the probe circuit and return one bit per qubit
//!         # todo!()
//!     }
//!
//!     async fn apply_correction(&self, h: &StateHandle, q: usize, p: Pauli) -> HalResult<()> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod backend;
pub mod error;
pub mod handle;

pub use backend::{BackendAvailability, QecBackend};
pub use error::{HalError, HalResult};
pub use handle::StateHandle;

pub use steane_code::{Basis, Measurement, Pauli};
