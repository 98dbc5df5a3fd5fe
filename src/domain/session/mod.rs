//! Session domain module.
//!
//! Holds the client-side record of who is signed in and the pure
//! transitions that change it.
//!
//! # Events
//!
//! See [`SessionEvent`]. Each event is applied through [`reduce`], which
//! returns the next [`SessionState`] plus the [`StoreEffect`] the persisted
//! store must mirror.

mod credentials;
mod errors;
mod events;
mod forms;
mod reducer;
mod state;
mod user;

pub use credentials::{AccessToken, SessionCredentials};
pub use errors::SessionError;
pub use events::SessionEvent;
pub use forms::{LoginForm, Password, RegistrationForm};
pub use reducer::{reduce, StoreEffect, Transition};
pub use state::SessionState;
pub use user::UserSummary;
