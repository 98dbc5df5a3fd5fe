//! Domain layer containing pure types and state transitions.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, roles, errors)
//! - `session` - Session state and its reducer
//! - `appointment` - Appointment payloads, booking validation, dashboard list
//! - `routing` - Location table and route guard

pub mod appointment;
pub mod foundation;
pub mod routing;
pub mod session;
