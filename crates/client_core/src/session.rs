use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::protocol::{CostEstimate, EstimateRequest};

/// User-safe failure text; the concrete cause stays in the diagnostics.
pub const ESTIMATE_FAILURE_MESSAGE: &str =
    "Failed to calculate cost estimate. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Which of the two screens a renderer should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Form,
    Results,
}

/// Serializable view over the session state, handed to renderers and event
/// subscribers. Never exposes the internal failure cause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SubmissionPhase,
    pub screen: Screen,
    pub estimate: Option<CostEstimate>,
    pub failure_message: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
}

/// The submission lifecycle as an explicit state machine.
///
/// All transitions are synchronous and side-effect free; the async driver in
/// [`crate::CostEstimatorClient`] owns an instance and commits transitions
/// around the webhook round trip. The stored estimate is replaced wholesale
/// on success, left untouched on failure, and cleared only by `reset`.
#[derive(Debug)]
pub struct SessionState {
    phase: SubmissionPhase,
    screen: Screen,
    estimate: Option<CostEstimate>,
    failure_message: Option<String>,
    received_at: Option<DateTime<Utc>>,
    last_payload: Option<EstimateRequest>,
    last_failure: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            screen: Screen::Form,
            estimate: None,
            failure_message: None,
            received_at: None,
            last_payload: None,
            last_failure: None,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            screen: self.screen,
            estimate: self.estimate.clone(),
            failure_message: self.failure_message.clone(),
            received_at: self.received_at,
        }
    }

    /// Last failure cause, retained for diagnostics only.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Enter `Submitting` and remember the payload for replay.
    ///
    /// Returns false (and changes nothing) while a request is already in
    /// flight: at most one outstanding request per session.
    pub fn begin_submit(&mut self, payload: EstimateRequest) -> bool {
        if self.phase == SubmissionPhase::Submitting {
            return false;
        }
        self.last_payload = Some(payload);
        self.phase = SubmissionPhase::Submitting;
        true
    }

    /// Commit a successful round trip: the estimate replaces any previous
    /// one and the results screen activates.
    pub fn complete_success(&mut self, estimate: CostEstimate, received_at: DateTime<Utc>) {
        if self.phase != SubmissionPhase::Submitting {
            return;
        }
        self.phase = SubmissionPhase::Success;
        self.screen = Screen::Results;
        self.estimate = Some(estimate);
        self.received_at = Some(received_at);
        self.failure_message = None;
        self.last_failure = None;
    }

    /// Commit a failed round trip. The caller-visible message is always the
    /// generic one; `cause` is kept privately for diagnostics. The stored
    /// estimate is not modified.
    pub fn complete_failure(&mut self, cause: String) {
        if self.phase != SubmissionPhase::Submitting {
            return;
        }
        self.phase = SubmissionPhase::Failed;
        self.screen = Screen::Form;
        self.failure_message = Some(ESTIMATE_FAILURE_MESSAGE.to_owned());
        self.last_failure = Some(cause);
    }

    /// The payload to replay for a retry, only meaningful from `Failed`.
    pub fn replay_payload(&self) -> Option<EstimateRequest> {
        if self.phase != SubmissionPhase::Failed {
            return None;
        }
        self.last_payload.clone()
    }

    /// Return to `Idle`/form screen, clearing estimate and message.
    ///
    /// Only allowed from a settled state; returns false otherwise.
    pub fn reset(&mut self) -> bool {
        if !matches!(
            self.phase,
            SubmissionPhase::Success | SubmissionPhase::Failed
        ) {
            return false;
        }
        self.phase = SubmissionPhase::Idle;
        self.screen = Screen::Form;
        self.estimate = None;
        self.received_at = None;
        self.failure_message = None;
        self.last_failure = None;
        true
    }

    /// Switch the presentation back to the form without clearing anything.
    pub fn back_to_form(&mut self) {
        self.screen = Screen::Form;
    }
}
