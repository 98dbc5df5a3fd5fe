//! Route guard: may the current session render a route?

use super::Route;
use crate::domain::foundation::Role;
use crate::domain::session::SessionState;

/// Decision taken for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Not signed in.
    RedirectToLogin,
    /// Signed in with a valid role, but the route belongs to another role.
    RedirectToRoleHome(Role),
    /// Signed in with a missing or unrecognized role on a role-restricted route.
    RedirectToLanding,
}

impl GuardDecision {
    /// Where to go instead, if the target is refused.
    pub fn redirect_route(&self) -> Option<Route> {
        match self {
            GuardDecision::Allow => None,
            GuardDecision::RedirectToLogin => Some(Route::Login),
            GuardDecision::RedirectToRoleHome(role) => Some(Route::Dashboard(*role)),
            GuardDecision::RedirectToLanding => Some(Route::Home),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Evaluates navigation targets against the session.
///
/// Stateless; evaluated synchronously on every navigation.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(&self, session: &SessionState, target: Route) -> GuardDecision {
        let Some(allowed) = target.allowed_roles() else {
            return GuardDecision::Allow;
        };

        if !session.is_authenticated() {
            return GuardDecision::RedirectToLogin;
        }

        // Fail closed: no recognized role never satisfies a role set.
        match session.role() {
            Some(role) if allowed.contains(&role) => GuardDecision::Allow,
            Some(role) => GuardDecision::RedirectToRoleHome(role),
            None => GuardDecision::RedirectToLanding,
        }
    }
}
