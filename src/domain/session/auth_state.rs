//! Authentication lifecycle state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where the session lifecycle currently is.
///
/// Starts in `Checking` until the persisted token has been tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Checking,
    Authenticated,
    Unauthenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    pub fn is_checking(&self) -> bool {
        matches!(self, AuthState::Checking)
    }
}

impl StateMachine for AuthState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AuthState::*;
        matches!(
            (self, target),
            (Checking, Authenticated)
                | (Checking, Unauthenticated)
                | (Authenticated, Unauthenticated)
                | (Unauthenticated, Authenticated)
                | (Unauthenticated, Unauthenticated)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AuthState::*;
        match self {
            Checking => vec![Authenticated, Unauthenticated],
            Authenticated => vec![Unauthenticated],
            Unauthenticated => vec![Authenticated, Unauthenticated],
        }
    }
}
