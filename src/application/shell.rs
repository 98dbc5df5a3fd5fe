//! AppShell - the application root.
//!
//! Owns the current location, applies the route guard on every navigation,
//! and turns session signals into navigation commands. The pipeline never
//! navigates by itself; it only invalidates the session, and the shell
//! reacts to the resulting [`SessionSignal`].

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::session_context::{SessionContext, SessionSignal};
use crate::domain::routing::{GuardDecision, Resolved, Route, RouteGuard};

/// Where one navigation attempt ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: String,
    pub location: String,
    pub route: Route,
    pub decision: GuardDecision,
}

impl Navigation {
    pub fn redirected(&self) -> bool {
        self.requested != self.location
    }
}

pub struct AppShell {
    session: Arc<SessionContext>,
    guard: RouteGuard,
    signals: broadcast::Receiver<SessionSignal>,
    location: String,
    route: Route,
    history: Vec<String>,
}

impl AppShell {
    /// Starts at the landing page.
    pub fn new(session: Arc<SessionContext>) -> Self {
        let signals = session.subscribe();
        Self {
            session,
            guard: RouteGuard,
            signals,
            location: Route::Home.path().to_string(),
            route: Route::Home,
            history: Vec::new(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Every location the shell has moved to, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Navigates to `path`, following legacy aliases and guard redirects.
    pub async fn navigate(&mut self, path: &str) -> Navigation {
        let state = self.session.snapshot().await;

        let (route, mut location) = match Route::resolve(path) {
            Resolved::Route(Route::NotFound) => (Route::NotFound, path.to_string()),
            Resolved::Route(route) => (route, route.path().to_string()),
            Resolved::Alias(route) => {
                debug!(from = path, to = route.path(), "Following legacy location");
                (route, route.path().to_string())
            }
        };

        let decision = self.guard.evaluate(&state, route);
        let mut landed = route;
        if let Some(redirect) = decision.redirect_route() {
            info!(requested = path, redirect = redirect.path(), ?decision, "Navigation redirected");
            landed = redirect;
            location = redirect.path().to_string();
        }

        self.move_to(landed, location.clone());
        Navigation {
            requested: path.to_string(),
            location,
            route: landed,
            decision,
        }
    }

    /// Drains pending session signals and applies their navigation.
    ///
    /// Returns the number of location changes made.
    pub async fn process_signals(&mut self) -> usize {
        let mut moves = 0;
        loop {
            let signal = match self.signals.try_recv() {
                Ok(signal) => signal,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Missed session signals");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            };

            let target = match signal {
                SessionSignal::SignedIn { role: Some(role) } => Route::Dashboard(role),
                SessionSignal::SignedIn { role: None } => Route::Home,
                SessionSignal::Registered
                | SessionSignal::SignedOut
                | SessionSignal::Invalidated => Route::Login,
            };

            // Already there: no second redirect.
            if self.route == target {
                debug!(?signal, location = %self.location, "Signal needs no navigation");
                continue;
            }

            debug!(?signal, to = target.path(), "Navigating on session signal");
            let before = self.location.clone();
            self.navigate(target.path()).await;
            if self.location != before {
                moves += 1;
            }
        }
        moves
    }

    fn move_to(&mut self, route: Route, location: String) {
        self.route = route;
        self.location = location.clone();
        self.history.push(location);
    }
}
