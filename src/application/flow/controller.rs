//! Generic assessment flow controller.
//!
//! All three modes share one lifecycle:
//!
//! ```text
//! Loading -> Ready -> Submitting -> Completed
//!                 ^         |
//!                 +- Failed <+
//! ```
//!
//! What differs per mode (what to fetch first, what the draft looks like,
//! how it is validated and sent) lives in an [`AssessmentStrategy`].

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::application::route_guard::{Redirect, Route};
use crate::domain::assessment::{AssessmentMode, FlowStatus, Submission};
use crate::domain::foundation::{ClientError, PredictionId, StateMachine, ValidationError};

/// Errors reported by a flow controller.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Assessment is not ready (currently {0})")]
    NotReady(FlowStatus),

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Assessment was closed; result discarded")]
    Detached,

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl Redirect for FlowError {
    fn redirect(&self) -> Option<Route> {
        match self {
            FlowError::Client(e) => e.redirect(),
            _ => None,
        }
    }
}

/// The mode-specific half of a flow.
#[async_trait]
pub trait AssessmentStrategy: Send + Sync {
    /// Loaded once by `start()` (questions, suggestions, or nothing).
    type Input: Send + Sync;
    /// What the user is editing.
    type Draft: Default + Send;
    /// What a valid draft becomes on the wire.
    type Payload: Send;

    fn mode(&self) -> AssessmentMode;

    async fn fetch_input(&self) -> Result<Self::Input, ClientError>;

    fn validate(&self, input: &Self::Input, draft: &Self::Draft) -> Result<Self::Payload, ValidationError>;

    async fn submit(&self, payload: Self::Payload) -> Result<Submission, ClientError>;

    /// Adjusts the draft after a local validation failure.
    fn recover(&self, _draft: &mut Self::Draft, _error: &ValidationError) {}

    /// Adjusts the draft after a successful submission.
    fn on_success(&self, _draft: &mut Self::Draft) {}

    /// Wording shown next to the input for a local validation failure.
    fn message_for(&self, error: &ValidationError) -> String {
        error.to_string()
    }
}

pub(crate) struct FlowState<S: AssessmentStrategy> {
    pub(crate) status: FlowStatus,
    pub(crate) input: Option<S::Input>,
    pub(crate) draft: S::Draft,
    fetching: bool,
    detached: bool,
    last_error: Option<FlowError>,
    completed: Option<Submission>,
}

impl<S: AssessmentStrategy> FlowState<S> {
    /// Applies a transition; an invalid one leaves the status untouched.
    fn move_to(&mut self, target: FlowStatus) -> Result<(), FlowError> {
        match self.status.transition_to(target) {
            Ok(next) => {
                tracing::debug!(from = %self.status, to = %next, "Flow status changed");
                self.status = next;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Rejected flow status change");
                Err(FlowError::NotReady(self.status))
            }
        }
    }
}

/// Drives one assessment from loading to a stored prediction.
///
/// State sits behind a `Mutex` that is never held across an `.await`.
pub struct FlowController<S: AssessmentStrategy> {
    strategy: S,
    state: Mutex<FlowState<S>>,
}

impl<S: AssessmentStrategy> FlowController<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            state: Mutex::new(FlowState {
                status: FlowStatus::Loading,
                input: None,
                draft: S::Draft::default(),
                fetching: false,
                detached: false,
                last_error: None,
                completed: None,
            }),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, FlowState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn mode(&self) -> AssessmentMode {
        self.strategy.mode()
    }

    pub fn status(&self) -> FlowStatus {
        self.lock().status
    }

    /// The most recent failure, local or remote. Cleared on success.
    pub fn last_error(&self) -> Option<FlowError> {
        self.lock().last_error.clone()
    }

    /// `last_error` worded for display next to the input.
    pub fn error_message(&self) -> Option<String> {
        self.last_error().map(|err| match &err {
            FlowError::Validation(v) => self.strategy.message_for(v),
            other => other.to_string(),
        })
    }

    pub fn completed_id(&self) -> Option<PredictionId> {
        self.lock().completed.as_ref().map(|s| s.prediction_id.clone())
    }

    pub fn completed_submission(&self) -> Option<Submission> {
        self.lock().completed.clone()
    }

    /// Navigation target once the flow has completed.
    pub fn result_route(&self) -> Option<Route> {
        self.completed_id().map(|id| Route::result(self.mode(), id))
    }

    /// Marks the view as gone. Results of in-flight calls are dropped.
    pub fn detach(&self) {
        self.lock().detached = true;
        tracing::debug!(mode = %self.mode(), "Flow detached");
    }

    pub fn is_detached(&self) -> bool {
        self.lock().detached
    }

    /// Loads the flow's input. Failure leaves the flow in `Loading` so it can
    /// be retried; once loaded, further calls do nothing.
    pub async fn start(&self) -> Result<(), FlowError> {
        {
            let mut state = self.lock();
            if state.detached {
                return Err(FlowError::Detached);
            }
            if state.status != FlowStatus::Loading || state.fetching {
                return Ok(());
            }
            state.fetching = true;
        }

        let fetched = self.strategy.fetch_input().await;

        let mut state = self.lock();
        state.fetching = false;
        if state.detached {
            return Err(FlowError::Detached);
        }
        match fetched {
            Ok(input) => {
                state.move_to(FlowStatus::Ready)?;
                state.input = Some(input);
                state.last_error = None;
                tracing::info!(mode = %self.mode(), "Assessment ready");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(mode = %self.mode(), error = %e, "Failed to load assessment");
                let err = FlowError::from(e);
                state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Validates the draft and submits it.
    ///
    /// A local validation failure never reaches the network. A second call
    /// while one is in flight is rejected rather than queued.
    pub async fn submit(&self) -> Result<PredictionId, FlowError> {
        let payload = {
            let mut guard = self.lock();
            let state = &mut *guard;
            if state.detached {
                return Err(FlowError::Detached);
            }
            match state.status {
                FlowStatus::Ready => {}
                FlowStatus::Submitting => return Err(FlowError::SubmissionInFlight),
                other => return Err(FlowError::NotReady(other)),
            }
            let Some(input) = state.input.as_ref() else {
                return Err(FlowError::NotReady(state.status));
            };

            let payload = match self.strategy.validate(input, &state.draft) {
                Ok(payload) => payload,
                Err(e) => {
                    self.strategy.recover(&mut state.draft, &e);
                    let err = FlowError::from(e);
                    state.last_error = Some(err.clone());
                    return Err(err);
                }
            };
            // Claimed under the same guard that saw `Ready`.
            state.move_to(FlowStatus::Submitting)?;
            payload
        };

        tracing::info!(mode = %self.mode(), "Submitting assessment");

        let result = self.strategy.submit(payload).await;

        let mut guard = self.lock();
        let state = &mut *guard;
        if state.detached {
            tracing::debug!(mode = %self.mode(), "Discarding result for detached flow");
            return Err(FlowError::Detached);
        }
        match result {
            Ok(submission) => {
                let id = submission.prediction_id.clone();
                state.move_to(FlowStatus::Completed)?;
                self.strategy.on_success(&mut state.draft);
                state.last_error = None;
                state.completed = Some(submission);
                tracing::info!(mode = %self.mode(), prediction_id = %id, "Assessment completed");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(mode = %self.mode(), error = %e, "Submission failed");
                let err = FlowError::from(e);
                state.last_error = Some(err.clone());
                state.move_to(FlowStatus::Failed)?;
                state.move_to(FlowStatus::Ready)?;
                Err(err)
            }
        }
    }

    /// Runs `f` on the draft if input is currently accepted.
    pub(crate) fn edit<R>(
        &self,
        f: impl FnOnce(&S::Input, &mut S::Draft) -> Result<R, ValidationError>,
    ) -> Result<R, FlowError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.detached {
            return Err(FlowError::Detached);
        }
        if state.status == FlowStatus::Submitting {
            return Err(FlowError::SubmissionInFlight);
        }
        let status = state.status;
        match (state.input.as_ref(), status.accepts_input()) {
            (Some(input), true) => Ok(f(input, &mut state.draft)?),
            _ => Err(FlowError::NotReady(status)),
        }
    }

    /// Reads the draft and input under the lock.
    pub(crate) fn view<R>(&self, f: impl FnOnce(Option<&S::Input>, &S::Draft) -> R) -> R {
        let state = self.lock();
        f(state.input.as_ref(), &state.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assessment::InMemoryAssessmentBackend;
    use crate::ports::TextApi;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Minimal strategy: draft is a string that must be non-empty.
    struct EchoStrategy {
        backend: Arc<InMemoryAssessmentBackend>,
        fetch_failures: AtomicUsize,
    }

    #[async_trait]
    impl AssessmentStrategy for EchoStrategy {
        type Input = ();
        type Draft = String;
        type Payload = String;

        fn mode(&self) -> AssessmentMode {
            AssessmentMode::Text
        }

        async fn fetch_input(&self) -> Result<(), ClientError> {
            if self.fetch_failures.load(Ordering::SeqCst) > 0 {
                self.fetch_failures.fetch_sub(1, Ordering::SeqCst);
                return Err(ClientError::network("offline"));
            }
            Ok(())
        }

        fn validate(&self, _input: &(), draft: &String) -> Result<String, ValidationError> {
            if draft.is_empty() {
                return Err(ValidationError::empty_field("text"));
            }
            Ok(draft.clone())
        }

        async fn submit(&self, payload: String) -> Result<Submission, ClientError> {
            self.backend.submit_text(&payload).await
        }

        fn on_success(&self, draft: &mut String) {
            draft.clear();
        }
    }

    fn controller(backend: Arc<InMemoryAssessmentBackend>, fetch_failures: usize) -> Arc<FlowController<EchoStrategy>> {
        Arc::new(FlowController::new(EchoStrategy {
            backend,
            fetch_failures: AtomicUsize::new(fetch_failures),
        }))
    }

    fn set_draft(flow: &FlowController<EchoStrategy>, text: &str) {
        flow.edit(|_, draft| {
            *draft = text.to_string();
            Ok(())
        })
        .unwrap();
    }

    #[tokio::test]
    async fn failed_start_stays_loading_and_can_retry() {
        let flow = controller(Arc::new(InMemoryAssessmentBackend::new()), 1);

        assert!(flow.start().await.is_err());
        assert_eq!(flow.status(), FlowStatus::Loading);
        assert!(flow.last_error().is_some());

        flow.start().await.unwrap();
        assert_eq!(flow.status(), FlowStatus::Ready);
        assert!(flow.last_error().is_none());
    }

    #[tokio::test]
    async fn submit_before_start_is_not_ready() {
        let flow = controller(Arc::new(InMemoryAssessmentBackend::new()), 0);
        assert!(matches!(
            flow.submit().await,
            Err(FlowError::NotReady(FlowStatus::Loading))
        ));
    }

    #[tokio::test]
    async fn invalid_draft_makes_no_call() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let flow = controller(backend.clone(), 0);
        flow.start().await.unwrap();

        assert!(matches!(flow.submit().await, Err(FlowError::Validation(_))));
        assert_eq!(backend.submit_calls(), 0);
        assert_eq!(flow.status(), FlowStatus::Ready);
    }

    #[tokio::test]
    async fn failure_returns_to_ready_with_draft_intact() {
        let backend = Arc::new(InMemoryAssessmentBackend::new().with_error(ClientError::Backend {
            status: 500,
            message: "Prediction failed".into(),
        }));
        let flow = controller(backend.clone(), 0);
        flow.start().await.unwrap();
        set_draft(&flow, "hello");

        let err = flow.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Prediction failed");
        assert_eq!(flow.status(), FlowStatus::Ready);
        assert_eq!(flow.view(|_, draft| draft.clone()), "hello");

        backend.clear_error();
        let id = flow.submit().await.unwrap();
        assert_eq!(flow.status(), FlowStatus::Completed);
        assert_eq!(flow.completed_id(), Some(id.clone()));
        assert_eq!(flow.result_route(), Some(Route::result(AssessmentMode::Text, id)));
        assert_eq!(flow.view(|_, draft| draft.clone()), "");
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_rejected() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let gate = backend.hold_submissions();
        let flow = controller(backend.clone(), 0);
        flow.start().await.unwrap();
        set_draft(&flow, "hello");

        let first = tokio::spawn({
            let flow = flow.clone();
            async move { flow.submit().await }
        });
        while flow.status() != FlowStatus::Submitting {
            tokio::task::yield_now().await;
        }

        assert!(matches!(flow.submit().await, Err(FlowError::SubmissionInFlight)));
        assert!(matches!(
            flow.edit(|_, _| Ok(())),
            Err(FlowError::SubmissionInFlight)
        ));

        gate.notify_one();
        assert!(first.await.unwrap().is_ok());
        assert_eq!(backend.submit_calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn simultaneous_submits_reach_the_backend_once() {
        const CALLERS: usize = 8;

        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let gate = backend.hold_submissions();
        let flow = controller(backend.clone(), 0);
        flow.start().await.unwrap();
        set_draft(&flow, "hello");

        let barrier = Arc::new(tokio::sync::Barrier::new(CALLERS));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        for _ in 0..CALLERS {
            let (flow, barrier, tx) = (flow.clone(), barrier.clone(), tx.clone());
            tokio::spawn(async move {
                barrier.wait().await;
                let _ = tx.send(flow.submit().await);
            });
        }

        let wait = std::time::Duration::from_secs(5);
        for _ in 1..CALLERS {
            let result = tokio::time::timeout(wait, rx.recv()).await.unwrap().unwrap();
            assert!(matches!(result, Err(FlowError::SubmissionInFlight)));
        }

        gate.notify_one();
        let winner = tokio::time::timeout(wait, rx.recv()).await.unwrap().unwrap();
        assert!(winner.is_ok());
        assert_eq!(flow.status(), FlowStatus::Completed);
        assert_eq!(backend.submit_calls(), 1);
    }

    #[test]
    fn invalid_transition_is_reported_and_leaves_status_alone() {
        let flow = controller(Arc::new(InMemoryAssessmentBackend::new()), 0);
        let mut state = flow.lock();
        assert!(matches!(
            state.move_to(FlowStatus::Completed),
            Err(FlowError::NotReady(FlowStatus::Loading))
        ));
        assert_eq!(state.status, FlowStatus::Loading);
    }

    #[tokio::test]
    async fn detached_flow_drops_in_flight_result() {
        let backend = Arc::new(InMemoryAssessmentBackend::new());
        let gate = backend.hold_submissions();
        let flow = controller(backend.clone(), 0);
        flow.start().await.unwrap();
        set_draft(&flow, "hello");

        let pending = tokio::spawn({
            let flow = flow.clone();
            async move { flow.submit().await }
        });
        while flow.status() != FlowStatus::Submitting {
            tokio::task::yield_now().await;
        }

        flow.detach();
        gate.notify_one();

        assert!(matches!(pending.await.unwrap(), Err(FlowError::Detached)));
        assert!(flow.completed_id().is_none());
        // The request itself was not cancelled.
        assert_eq!(backend.stored_count(), 1);
    }

    #[test]
    fn only_client_auth_failures_redirect() {
        use crate::domain::foundation::AuthError;

        assert_eq!(
            FlowError::from(ClientError::from(AuthError::InvalidToken)).redirect(),
            Some(Route::Login)
        );
        assert_eq!(FlowError::SubmissionInFlight.redirect(), None);
    }
}
