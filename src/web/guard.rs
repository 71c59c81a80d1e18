use axum::response::{IntoResponse, Redirect, Response};

use crate::models::Role;
use crate::web::middleware::auth::CurrentUser;

/// What the guard knows about the caller at decision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session at all.
    Anonymous,
    /// A session exists but the profile has not been resolved yet. The guard
    /// must not redirect during this window.
    Resolving,
    /// Session and profile resolved to a role.
    Resolved(Role),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    RedirectToLogin,
    RedirectToHome,
    /// Neutral holding state while resolution is pending.
    Loading,
}

/// Pure access decision: render iff a session is present and the role passes
/// the allow-list (an absent allow-list admits every role). Anonymous callers
/// go to the sign-in page, excluded roles go home.
pub fn decide(session: SessionState, allowed: Option<&[Role]>) -> GuardOutcome {
    match session {
        SessionState::Resolving => GuardOutcome::Loading,
        SessionState::Anonymous => GuardOutcome::RedirectToLogin,
        SessionState::Resolved(role) => match allowed {
            None => GuardOutcome::Render,
            Some(list) if list.contains(&role) => GuardOutcome::Render,
            Some(_) => GuardOutcome::RedirectToHome,
        },
    }
}

/// Handler-side shim: by the time a protected handler runs, the session
/// middleware has resolved the profile, so only the terminal outcomes apply.
pub fn require(user: &CurrentUser, allowed: &[Role]) -> Result<(), Response> {
    match decide(SessionState::Resolved(user.role), Some(allowed)) {
        GuardOutcome::Render => Ok(()),
        GuardOutcome::RedirectToLogin => Err(Redirect::to("/login").into_response()),
        GuardOutcome::RedirectToHome | GuardOutcome::Loading => {
            Err(Redirect::to("/").into_response())
        }
    }
}
