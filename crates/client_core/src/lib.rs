use std::sync::Arc;

use chrono::Utc;
use shared::{
    error::EstimateError,
    protocol::{CostEstimate, EstimateRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

pub mod form;
pub mod normalize;
pub mod session;
pub mod transport;

pub use form::{FormData, FormUpdate};
pub use normalize::normalize_estimate;
pub use session::{
    Screen, SessionSnapshot, SubmissionPhase, ESTIMATE_FAILURE_MESSAGE,
};
pub use transport::{
    EstimateBackend, MissingEstimateBackend, WebhookBackend, DEFAULT_REQUEST_TIMEOUT,
};

use session::SessionState;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Broadcast on every committed transition so renderers can follow along
/// without polling.
#[derive(Debug, Clone)]
pub enum EstimatorEvent {
    StateChanged(SessionSnapshot),
    ScreenChanged(Screen),
}

/// Async driver around the session state machine.
///
/// Owns the single mutable session state behind a mutex; the lock is never
/// held across the webhook await, so readers observe `Submitting` while the
/// round trip is in flight and the guard in the state machine turns any
/// concurrent submit into a no-op.
pub struct CostEstimatorClient {
    backend: Arc<dyn EstimateBackend>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<EstimatorEvent>,
}

impl CostEstimatorClient {
    pub fn new(backend: Arc<dyn EstimateBackend>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            backend,
            inner: Mutex::new(SessionState::new()),
            events,
        })
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EstimatorEvent> {
        self.events.subscribe()
    }

    /// Validate the form and submit its derived payload.
    ///
    /// Returns `Err` only for an incomplete form, which never reaches the
    /// network layer. Transport and decoding failures settle the session in
    /// `Failed` and are reported through the returned snapshot instead.
    pub async fn submit(&self, form: &FormData) -> Result<SessionSnapshot, EstimateError> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(EstimateError::Validation { missing });
        }
        Ok(self.submit_payload(form.to_request()).await)
    }

    /// Replay the payload of the most recent submission.
    ///
    /// Only meaningful from `Failed`; a no-op anywhere else. The remembered
    /// payload is replayed as stored, even if the form has been edited since.
    pub async fn retry(&self) -> SessionSnapshot {
        let payload = {
            let state = self.inner.lock().await;
            match state.replay_payload() {
                Some(payload) => payload,
                None => return state.snapshot(),
            }
        };
        info!("retrying estimate submission with remembered payload");
        self.submit_payload(payload).await
    }

    /// Clear the settled result and return to the idle form.
    pub async fn reset(&self) -> SessionSnapshot {
        let mut state = self.inner.lock().await;
        let screen_before = state.screen();
        if state.reset() {
            self.emit_transition(&state, screen_before);
        }
        state.snapshot()
    }

    /// Present the form again without discarding the stored result.
    pub async fn back_to_form(&self) -> SessionSnapshot {
        let mut state = self.inner.lock().await;
        let screen_before = state.screen();
        state.back_to_form();
        if state.screen() != screen_before {
            let _ = self
                .events
                .send(EstimatorEvent::ScreenChanged(state.screen()));
        }
        state.snapshot()
    }

    async fn submit_payload(&self, payload: EstimateRequest) -> SessionSnapshot {
        {
            let mut state = self.inner.lock().await;
            let screen_before = state.screen();
            if !state.begin_submit(payload.clone()) {
                // A request is already in flight; the caller sees the
                // unchanged Submitting snapshot and no second request goes
                // out.
                return state.snapshot();
            }
            self.emit_transition(&state, screen_before);
        }

        let outcome = self.perform(&payload).await;

        let mut state = self.inner.lock().await;
        let screen_before = state.screen();
        match outcome {
            Ok(estimate) => {
                state.complete_success(estimate, Utc::now());
                info!("estimate received");
            }
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err, "estimate submission failed");
                state.complete_failure(err.to_string());
            }
        }
        self.emit_transition(&state, screen_before);
        state.snapshot()
    }

    async fn perform(&self, payload: &EstimateRequest) -> Result<CostEstimate, EstimateError> {
        let document = self.backend.fetch_estimate(payload).await?;
        normalize_estimate(document)
    }

    fn emit_transition(&self, state: &SessionState, screen_before: Screen) {
        let _ = self
            .events
            .send(EstimatorEvent::StateChanged(state.snapshot()));
        if state.screen() != screen_before {
            let _ = self
                .events
                .send(EstimatorEvent::ScreenChanged(state.screen()));
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
