//! The correction-cycle state machine.

use std::sync::Arc;

use steane_code::{
    Basis, BlochAngles, Classification, CodeError, ColorCode, DecodeResult, ErrorEvent,
    FaultPattern, Measurement, SyndromeDelta, SyndromePair, SyndromeVector,
};
use steane_hal::{QecBackend, StateHandle};
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::outcome::{CorrectionAction, TrialOutcome};
use crate::state::PipelineState;

/// One encode → measure → inject → decode → correct → verify cycle against
/// a [`QecBackend`].
///
/// Steps must be called in order; an out-of-order call fails with
/// [`PipelineError::IllegalState`] and leaves the pipeline untouched. Any
/// backend failure moves the pipeline to [`PipelineState::Aborted`]. The
/// pipeline never retries.
pub struct QecPipeline {
    backend: Arc<dyn QecBackend>,
    code: Arc<ColorCode>,
    state: PipelineState,
    handle: Option<StateHandle>,
    baseline: Option<SyndromePair>,
    post_error: Option<SyndromePair>,
    deltas: Option<(SyndromeDelta, SyndromeDelta)>,
    decoded: Option<DecodeResult>,
    correction: Option<CorrectionAction>,
}

impl QecPipeline {
    /// Create a pipeline in [`PipelineState::Created`].
    pub fn new(backend: Arc<dyn QecBackend>, code: Arc<ColorCode>) -> Self {
        Self {
            backend,
            code,
            state: PipelineState::Created,
            handle: None,
            baseline: None,
            post_error: None,
            deltas: None,
            decoded: None,
            correction: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Backend handle of the encoded block, once encoded.
    pub fn handle(&self) -> Option<StateHandle> {
        self.handle
    }

    /// Stored baseline syndromes.
    pub fn baseline(&self) -> Option<SyndromePair> {
        self.baseline
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[PipelineState],
    ) -> PipelineResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(PipelineError::IllegalState {
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = %self.state, to = %next, "pipeline transition");
        self.state = next;
    }

    /// Record a backend-side failure and move to `Aborted`.
    fn abort<T>(&mut self, operation: &'static str, err: PipelineError) -> PipelineResult<T> {
        warn!(operation, error = %err, "trial aborted");
        self.state = PipelineState::Aborted;
        Err(err)
    }

    fn current_handle(&self, operation: &'static str) -> PipelineResult<StateHandle> {
        self.handle.ok_or(PipelineError::IllegalState {
            operation,
            state: self.state,
        })
    }

    fn syndrome(&self, basis: Basis, measurement: &Measurement) -> PipelineResult<SyndromeVector> {
        self.code
            .syndrome(basis, measurement)
            .map_err(|err| match err {
                CodeError::MalformedMeasurement { expected, got } => {
                    PipelineError::MalformedMeasurement {
                        basis,
                        expected,
                        got,
                    }
                }
                other => PipelineError::Code(other),
            })
    }

    /// Probe both bases and reduce to syndromes.
    async fn measure_pair(&self, handle: &StateHandle) -> PipelineResult<SyndromePair> {
        let (mx, mz) = self.backend.measure_both(handle).await?;
        Ok(SyndromePair::new(
            self.syndrome(Basis::X, &mx)?,
            self.syndrome(Basis::Z, &mz)?,
        ))
    }

    /// Ask the backend to prepare the logical state `(theta, phi)`.
    pub async fn encode(&mut self, theta: f64, phi: f64) -> PipelineResult<StateHandle> {
        self.expect_state("encode", &[PipelineState::Created])?;
        match self.backend.encode(theta, phi).await {
            Ok(handle) => {
                self.handle = Some(handle);
                self.transition(PipelineState::Encoded);
                Ok(handle)
            }
            Err(err) => self.abort("encode", err.into()),
        }
    }

    /// Measure the fault-free reference syndromes.
    ///
    /// May be repeated before any fault is injected; the stored baseline is
    /// the latest measurement.
    pub async fn measure_baseline(&mut self) -> PipelineResult<SyndromePair> {
        self.expect_state(
            "measure baseline",
            &[PipelineState::Encoded, PipelineState::BaselineMeasured],
        )?;
        let handle = self.current_handle("measure baseline")?;
        match self.measure_pair(&handle).await {
            Ok(pair) => {
                debug!(baseline = %pair, "baseline measured");
                self.baseline = Some(pair);
                self.transition(PipelineState::BaselineMeasured);
                Ok(pair)
            }
            Err(err) => self.abort("measure baseline", err),
        }
    }

    /// Apply one fault, or nothing for `None`.
    pub async fn inject(&mut self, event: Option<ErrorEvent>) -> PipelineResult<()> {
        self.inject_pattern(&FaultPattern::from(event)).await
    }

    /// Apply every event of `pattern` in order. An empty pattern is a valid
    /// no-op that still advances the state.
    pub async fn inject_pattern(&mut self, pattern: &FaultPattern) -> PipelineResult<()> {
        self.expect_state(
            "inject fault",
            &[PipelineState::BaselineMeasured, PipelineState::ErrorInjected],
        )?;
        let handle = self.current_handle("inject fault")?;
        for event in pattern.events() {
            if let Err(err) = self
                .backend
                .inject_fault(&handle, event.qubit(), event.pauli())
                .await
            {
                return self.abort("inject fault", err.into());
            }
            debug!(%event, "fault injected");
        }
        self.transition(PipelineState::ErrorInjected);
        Ok(())
    }

    /// Re-measure both bases and compute the deltas against the baseline.
    pub async fn measure_post_error(
        &mut self,
    ) -> PipelineResult<(SyndromeDelta, SyndromeDelta)> {
        self.expect_state("measure post-error syndrome", &[PipelineState::ErrorInjected])?;
        let handle = self.current_handle("measure post-error syndrome")?;
        let baseline = self.baseline.ok_or(PipelineError::IllegalState {
            operation: "measure post-error syndrome",
            state: self.state,
        })?;
        match self.measure_pair(&handle).await {
            Ok(pair) => {
                let deltas = pair.delta(&baseline);
                debug!(post_error = %pair, dx = %deltas.0, dz = %deltas.1, "post-error syndrome");
                self.post_error = Some(pair);
                self.deltas = Some(deltas);
                self.transition(PipelineState::ErrorMeasured);
                Ok(deltas)
            }
            Err(err) => self.abort("measure post-error syndrome", err),
        }
    }

    /// Decode the stored deltas.
    pub fn decode(&mut self) -> PipelineResult<DecodeResult> {
        self.expect_state("decode", &[PipelineState::ErrorMeasured])?;
        let (dx, dz) = self.deltas.ok_or(PipelineError::IllegalState {
            operation: "decode",
            state: self.state,
        })?;
        let result = self.code.decoder().infer(dx, dz);
        debug!(%result, classification = %result.classification, "decoded");
        self.decoded = Some(result);
        self.transition(PipelineState::Decoded);
        Ok(result)
    }

    /// Undo the decoded fault if it is correctable.
    pub async fn correct(&mut self) -> PipelineResult<CorrectionAction> {
        self.expect_state("correct", &[PipelineState::Decoded])?;
        let handle = self.current_handle("correct")?;
        let decoded = self.decoded.ok_or(PipelineError::IllegalState {
            operation: "correct",
            state: self.state,
        })?;

        let action = match decoded.correction() {
            Some((qubit, pauli)) => {
                let inverse = pauli.inverse();
                if let Err(err) = self
                    .backend
                    .apply_correction(&handle, qubit, inverse)
                    .await
                {
                    return self.abort("correct", err.into());
                }
                CorrectionAction::Applied {
                    qubit,
                    pauli: inverse,
                }
            }
            None if decoded.classification == Classification::Uncorrectable => {
                CorrectionAction::Skipped
            }
            None => CorrectionAction::NotNeeded,
        };

        debug!(%action, "correction step");
        self.correction = Some(action);
        self.transition(PipelineState::Corrected);
        Ok(action)
    }

    /// Re-measure and compare with the baseline.
    pub async fn verify(&mut self) -> PipelineResult<TrialOutcome> {
        self.expect_state("verify", &[PipelineState::Corrected])?;
        let handle = self.current_handle("verify")?;
        let missing = PipelineError::IllegalState {
            operation: "verify",
            state: self.state,
        };
        let (Some(baseline), Some(post_error), Some(deltas), Some(decoded), Some(correction)) = (
            self.baseline,
            self.post_error,
            self.deltas,
            self.decoded,
            self.correction,
        ) else {
            return Err(missing);
        };

        match self.measure_pair(&handle).await {
            Ok(post_correction) => {
                let success = post_correction == baseline;
                debug!(post_correction = %post_correction, success, "verified");
                self.transition(PipelineState::Verified);
                Ok(TrialOutcome {
                    baseline_syndrome: baseline,
                    post_error_syndrome: post_error,
                    deltas,
                    decode_result: decoded,
                    correction,
                    post_correction_syndrome: post_correction,
                    success,
                })
            }
            Err(err) => self.abort("verify", err),
        }
    }

    /// Start another round on an already-encoded block.
    ///
    /// Allowed on a fresh pipeline (adopting a handle from elsewhere) or
    /// after `verify`. The given baseline becomes the reference for the new
    /// round; the block is not re-encoded.
    pub fn resume(&mut self, handle: StateHandle, baseline: SyndromePair) -> PipelineResult<()> {
        self.expect_state("resume", &[PipelineState::Created, PipelineState::Verified])?;
        self.handle = Some(handle);
        self.baseline = Some(baseline);
        self.post_error = None;
        self.deltas = None;
        self.decoded = None;
        self.correction = None;
        self.transition(PipelineState::BaselineMeasured);
        Ok(())
    }

    /// Release the backend state. A no-op if nothing was encoded.
    ///
    /// The pipeline ends up `Released` even when the backend rejects the
    /// release; the handle is gone either way.
    pub async fn release(&mut self) -> PipelineResult<()> {
        let released = match self.handle.take() {
            Some(handle) => self.backend.release(&handle).await,
            None => Ok(()),
        };
        self.transition(PipelineState::Released);
        released.map_err(Into::into)
    }

    /// Run a full cycle with `pattern` and return the outcome.
    ///
    /// The block is kept; call [`release`](Self::release) when done.
    pub async fn run_cycle(
        &mut self,
        angles: BlochAngles,
        pattern: &FaultPattern,
    ) -> PipelineResult<TrialOutcome> {
        self.encode(angles.theta, angles.phi).await?;
        self.measure_baseline().await?;
        self.inject_pattern(pattern).await?;
        self.measure_post_error().await?;
        self.decode()?;
        self.correct().await?;
        self.verify().await
    }
}

impl std::fmt::Debug for QecPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QecPipeline")
            .field("backend", &self.backend.name())
            .field("state", &self.state)
            .field("handle", &self.handle)
            .field("baseline", &self.baseline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steane_adapter_sim::SimulatorBackend;
    use steane_code::{LogicalState, Pauli};
    use steane_hal::HalError;

    fn pipeline(backend: Arc<SimulatorBackend>) -> QecPipeline {
        QecPipeline::new(backend, Arc::new(ColorCode::steane().unwrap()))
    }

    #[tokio::test]
    async fn test_reference_scenario_y_on_qubit_four() {
        let backend = Arc::new(SimulatorBackend::seeded(11).unwrap());
        let mut p = pipeline(backend.clone());

        p.encode(0.0, 0.0).await.unwrap();
        let baseline = p.measure_baseline().await.unwrap();
        assert_eq!(baseline.x.signs(), [1, 1, 1]);
        assert_eq!(baseline.z.signs(), [1, 1, -1]);

        p.inject(Some(ErrorEvent::new(4, Pauli::Y).unwrap())).await.unwrap();
        p.measure_post_error().await.unwrap();
        let decoded = p.decode().unwrap();
        assert_eq!(decoded.to_string(), "Y error on qubit 4");

        p.correct().await.unwrap();
        let outcome = p.verify().await.unwrap();
        assert_eq!(outcome.post_error_syndrome.x.signs(), [-1, -1, 1]);
        assert_eq!(outcome.post_error_syndrome.z.signs(), [-1, -1, -1]);
        assert_eq!(outcome.post_correction_syndrome, baseline);
        assert!(outcome.success);
        assert_eq!(p.state(), PipelineState::Verified);

        let handle = p.handle().unwrap();
        assert!(backend.residual_frame(&handle).unwrap().is_identity());
    }

    #[tokio::test]
    async fn test_inject_before_baseline_is_illegal() {
        let mut p = pipeline(Arc::new(SimulatorBackend::seeded(1).unwrap()));
        p.encode(0.0, 0.0).await.unwrap();

        let err = p
            .inject(Some(ErrorEvent::new(0, Pauli::X).unwrap()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::IllegalState {
                state: PipelineState::Encoded,
                ..
            }
        ));
        // The failed call does not move the pipeline.
        assert_eq!(p.state(), PipelineState::Encoded);
    }

    #[tokio::test]
    async fn test_decode_before_measure_is_illegal() {
        let mut p = pipeline(Arc::new(SimulatorBackend::seeded(1).unwrap()));
        assert!(matches!(
            p.decode(),
            Err(PipelineError::IllegalState { operation: "decode", .. })
        ));
    }

    #[tokio::test]
    async fn test_baseline_is_idempotent() {
        let mut p = pipeline(Arc::new(SimulatorBackend::seeded(5).unwrap()));
        p.encode(0.0, 0.0).await.unwrap();
        let first = p.measure_baseline().await.unwrap();
        let second = p.measure_baseline().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_no_fault_is_noop() {
        let mut p = pipeline(Arc::new(SimulatorBackend::seeded(5).unwrap()));
        let outcome = p
            .run_cycle(LogicalState::Plus.angles(), &FaultPattern::none())
            .await
            .unwrap();
        assert_eq!(outcome.decode_result.classification, Classification::NoError);
        assert_eq!(outcome.correction, CorrectionAction::NotNeeded);
        assert!(outcome.syndrome_unchanged());
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn test_uncorrectable_skips_correction() {
        let backend = Arc::new(SimulatorBackend::seeded(8).unwrap());
        let mut p = pipeline(backend.clone());
        // X on qubit 0 and Z on qubit 6 give inconsistent locations.
        let pattern = FaultPattern::from_events([
            ErrorEvent::new(0, Pauli::X).unwrap(),
            ErrorEvent::new(6, Pauli::Z).unwrap(),
        ]);
        let outcome = p
            .run_cycle(LogicalState::Zero.angles(), &pattern)
            .await
            .unwrap();
        assert_eq!(
            outcome.decode_result.classification,
            Classification::Uncorrectable
        );
        assert_eq!(outcome.correction, CorrectionAction::Skipped);
        assert!(!outcome.success);
        assert_eq!(backend.correction_count(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_backend_aborts() {
        let backend = Arc::new(SimulatorBackend::new().unwrap());
        backend.set_available(false);
        let mut p = pipeline(backend);

        let err = p.encode(0.0, 0.0).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(p.state(), PipelineState::Aborted);
        assert!(matches!(
            p.measure_baseline().await,
            Err(PipelineError::IllegalState { .. })
        ));
    }

    #[tokio::test]
    async fn test_resume_continues_on_same_block() {
        let backend = Arc::new(SimulatorBackend::seeded(21).unwrap());
        let mut p = pipeline(backend.clone());
        let first = p
            .run_cycle(
                LogicalState::Zero.angles(),
                &ErrorEvent::new(2, Pauli::Z).unwrap().into(),
            )
            .await
            .unwrap();
        assert!(first.success);

        let handle = p.handle().unwrap();
        p.resume(handle, first.baseline_syndrome).unwrap();
        p.inject(Some(ErrorEvent::new(5, Pauli::X).unwrap())).await.unwrap();
        p.measure_post_error().await.unwrap();
        assert_eq!(p.decode().unwrap().correction(), Some((5, Pauli::X)));
        p.correct().await.unwrap();
        assert!(p.verify().await.unwrap().success);
        assert_eq!(backend.live_states(), 1);

        p.release().await.unwrap();
        assert_eq!(p.state(), PipelineState::Released);
        assert_eq!(backend.live_states(), 0);
    }

    #[tokio::test]
    async fn test_failed_release_still_ends_released() {
        let backend = Arc::new(SimulatorBackend::seeded(3).unwrap());
        let mut p = pipeline(backend.clone());
        p.encode(0.0, 0.0).await.unwrap();
        let handle = p.handle().unwrap();
        backend.release(&handle).await.unwrap();

        let err = p.release().await.unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Backend(HalError::UnknownHandle(_))
        ));
        assert_eq!(p.state(), PipelineState::Released);
        assert!(p.handle().is_none());
        p.release().await.unwrap();
    }
}
