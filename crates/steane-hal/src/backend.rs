//! Backend trait for QEC cycle execution.
//!
//! The [`QecBackend`] trait is the only point where the classical control
//! plane touches quantum execution:
//!
//! ```text
//!   encode() ──→ inject_fault()* ──→ measure(X), measure(Z) ──→ apply_correction()? ──→ release()
//! ```
//!
//! ## Method table
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `availability()` | async | yes | `HalResult<BackendAvailability>` |
//! | `encode()` | async | yes | `HalResult<StateHandle>` |
//! | `inject_fault()` | async | yes | `HalResult<()>` |
//! | `measure()` | async | yes | `HalResult<Measurement>` |
//! | `apply_correction()` | async | yes | `HalResult<()>` |
//! | `release()` | async | provided | `HalResult<()>` |
//! | `measure_both()` | async | provided | `HalResult<(Measurement, Measurement)>` |
//!
//! Handles are stable: faults and corrections mutate the state behind a
//! handle in place. Every call is a single request/response with no partial
//! results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use steane_code::{Basis, Measurement, Pauli};

use crate::error::HalResult;
use crate::handle::StateHandle;

/// Trait for backends that can prepare, disturb, probe and repair an
/// encoded [[7,1,3]] block.
///
/// # Contract
///
/// - `encode()` MUST fail with `BackendUnavailable` when the backend is
///   offline and with `EncodingFailure` when preparation itself fails.
/// - `measure()` returns one outcome per physical qubit. Measuring MUST NOT
///   change the stabilizer eigenvalues of the block.
/// - `inject_fault()` and `apply_correction()` apply the same physical
///   operation; they are separate so backends can account for them
///   differently.
/// - Operations on a released or unknown handle fail with `UnknownHandle`.
#[async_trait]
pub trait QecBackend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Check whether the backend currently accepts work.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Prepare the logical state with Bloch angles `(theta, phi)`.
    async fn encode(&self, theta: f64, phi: f64) -> HalResult<StateHandle>;

    /// Apply a Pauli fault to one physical qubit.
    async fn inject_fault(&self, handle: &StateHandle, qubit: usize, pauli: Pauli)
    -> HalResult<()>;

    /// Probe all stabilizers of one basis.
    async fn measure(&self, handle: &StateHandle, basis: Basis) -> HalResult<Measurement>;

    /// Apply a recovery Pauli to one physical qubit.
    async fn apply_correction(
        &self,
        handle: &StateHandle,
        qubit: usize,
        pauli: Pauli,
    ) -> HalResult<()>;

    /// Discard the state behind `handle`.
    ///
    /// Default implementation does nothing.
    async fn release(&self, _handle: &StateHandle) -> HalResult<()> {
        Ok(())
    }

    /// Probe both bases, X first.
    async fn measure_both(&self, handle: &StateHandle) -> HalResult<(Measurement, Measurement)> {
        let x = self.measure(handle, Basis::X).await?;
        let z = self.measure(handle, Basis::Z).await?;
        Ok((x, z))
    }
}

/// Backend availability information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting work.
    pub is_available: bool,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Create availability for a backend that is always available.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            status_message: None,
        }
    }

    /// Create availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            status_message: Some(reason.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_availability_always_available() {
        let avail = BackendAvailability::always_available();
        assert!(avail.is_available);
        assert!(avail.status_message.is_none());
    }

    #[test]
    fn test_backend_availability_unavailable() {
        let avail = BackendAvailability::unavailable("maintenance");
        assert!(!avail.is_available);
        assert_eq!(avail.status_message, Some("maintenance".to_string()));
    }
}
