//! Application layer - session context, request pipeline, handlers and shell.
//!
//! This layer orchestrates domain transitions and coordinates between ports.
//! Handlers follow a command/query split: commands change the session or
//! backend state, queries only read.

mod api_error;
mod error;
pub mod handlers;
mod pipeline;
mod session_context;
mod shell;

pub use api_error::{ApiError, ApiErrorKind, FALLBACK_MESSAGE};
pub use error::ClientError;
pub use handlers::{
    CancelAppointmentCommand, CancelAppointmentHandler, CreateAppointmentCommand,
    CreateAppointmentHandler, CurrentUserHandler, CurrentUserQuery, GetAppointmentHandler,
    GetAppointmentQuery, ListDoctorAppointmentsHandler, ListDoctorsHandler,
    ListPatientAppointmentsHandler, LoginCommand, LoginHandler, LoginResult, LogoutHandler,
    LogoutResult, RefreshTokenHandler, RegisterCommand, RegisterHandler, RegisterResult,
};
pub use pipeline::{unwrap_envelope, Credential, RequestPipeline};
pub use session_context::{RequestCredential, SessionContext, SessionEpoch, SessionSignal};
pub use shell::{AppShell, Navigation};
