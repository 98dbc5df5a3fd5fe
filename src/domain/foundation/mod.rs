//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the role enum and error types that form the
//! vocabulary of the booking client.

mod errors;
mod ids;
pub mod role;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{AppointmentId, DoctorId, UserId};
pub use role::Role;
