//! Routing domain module.
//!
//! The location table and the guard deciding whether a session may render a
//! location.

mod guard;
mod route;

pub use guard::{GuardDecision, RouteGuard};
pub use route::{Resolved, Route};
