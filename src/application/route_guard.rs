//! Navigation targets and the access rule for protected pages.

use std::fmt;

use crate::domain::assessment::AssessmentMode;
use crate::domain::foundation::{ClientError, PredictionId};
use crate::domain::session::AuthState;

/// Every page of the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Home,
    /// Questionnaire test, text analyze, or twitter analyze page.
    Start(AssessmentMode),
    Result(AssessmentMode, PredictionId),
    History(AssessmentMode),
}

impl Route {
    /// Where to go after a successful submission.
    pub fn result(mode: AssessmentMode, id: PredictionId) -> Self {
        Route::Result(mode, id)
    }

    /// Browser-style path.
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Home => "/".to_string(),
            Route::Start(AssessmentMode::Questionnaire) => "/questionnaire/test".to_string(),
            Route::Start(mode) => format!("/{}/analyze", mode.path_segment()),
            Route::Result(mode, id) => format!("/{}/result/{}", mode.path_segment(), id),
            Route::History(mode) => format!("/{}/history", mode.path_segment()),
        }
    }

    /// Resolves a path; anything unrecognised lands on `Home`.
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["login"] => Route::Login,
            ["signup"] => Route::Signup,
            ["questionnaire", "test"] => Route::Start(AssessmentMode::Questionnaire),
            ["text", "analyze"] => Route::Start(AssessmentMode::Text),
            ["twitter", "analyze"] => Route::Start(AssessmentMode::Twitter),
            [mode, "history"] => mode
                .parse()
                .map(Route::History)
                .unwrap_or(Route::Home),
            [mode, "result", id] => match (mode.parse::<AssessmentMode>(), PredictionId::new(*id)) {
                (Ok(mode), Ok(id)) => Route::Result(mode, id),
                _ => Route::Home,
            },
            _ => Route::Home,
        }
    }

    /// Login and signup render for anyone.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What to show for a requested route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    /// The session is still being restored.
    ShowLoading,
    Redirect(Route),
}

/// Decides whether a route may render for the current auth state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, route: &Route, auth: AuthState) -> GuardDecision {
        if !route.is_protected() {
            return GuardDecision::Render;
        }
        match auth {
            AuthState::Checking => GuardDecision::ShowLoading,
            AuthState::Authenticated => GuardDecision::Render,
            AuthState::Unauthenticated => {
                tracing::debug!(route = %route, "Redirecting to login");
                GuardDecision::Redirect(Route::Login)
            }
        }
    }
}

/// Navigation that follows a failed call.
pub trait Redirect {
    /// `Route::Login` when the failure tore the session down.
    fn redirect(&self) -> Option<Route>;
}

impl Redirect for ClientError {
    fn redirect(&self) -> Option<Route> {
        self.requires_login().then_some(Route::Login)
    }
}
