//! FlowStatus enum for the lifecycle of an assessment flow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where an assessment flow currently is.
///
/// `Failed` is transient: a failed submission moves straight back to
/// `Ready` with the input intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    /// Fetching whatever the flow needs before input can start.
    #[default]
    Loading,
    /// Accepting input.
    Ready,
    Submitting,
    Completed,
    Failed,
}

impl FlowStatus {
    /// Returns true while the user may edit input.
    pub fn accepts_input(&self) -> bool {
        matches!(self, FlowStatus::Ready)
    }
}

impl StateMachine for FlowStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use FlowStatus::*;
        matches!(
            (self, target),
            (Loading, Ready)
                | (Ready, Submitting)
                | (Submitting, Completed)
                | (Submitting, Failed)
                | (Failed, Ready)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use FlowStatus::*;
        match self {
            Loading => vec![Ready],
            Ready => vec![Submitting],
            Submitting => vec![Completed, Failed],
            Failed => vec![Ready],
            Completed => vec![],
        }
    }
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowStatus::Loading => "loading",
            FlowStatus::Ready => "ready",
            FlowStatus::Submitting => "submitting",
            FlowStatus::Completed => "completed",
            FlowStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_loading() {
        assert_eq!(FlowStatus::default(), FlowStatus::Loading);
    }

    #[test]
    fn failure_returns_to_ready() {
        let status = FlowStatus::Ready
            .transition_to(FlowStatus::Submitting)
            .and_then(|s| s.transition_to(FlowStatus::Failed))
            .and_then(|s| s.transition_to(FlowStatus::Ready))
            .unwrap();
        assert!(status.accepts_input());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(FlowStatus::Completed.is_terminal());
        assert!(!FlowStatus::Failed.is_terminal());
    }

    #[test]
    fn cannot_submit_while_loading_or_submitting() {
        assert!(!FlowStatus::Loading.can_transition_to(&FlowStatus::Submitting));
        assert!(!FlowStatus::Submitting.can_transition_to(&FlowStatus::Submitting));
    }

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        use FlowStatus::*;
        for from in [Loading, Ready, Submitting, Completed, Failed] {
            for to in [Loading, Ready, Submitting, Completed, Failed] {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{from} -> {to}"
                );
            }
        }
    }
}
