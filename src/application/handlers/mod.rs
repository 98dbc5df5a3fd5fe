//! Command and query handlers, one per backend operation.

pub mod appointment;
pub mod auth;

pub use appointment::{
    CancelAppointmentCommand, CancelAppointmentHandler, CreateAppointmentCommand,
    CreateAppointmentHandler, GetAppointmentHandler, GetAppointmentQuery,
    ListDoctorAppointmentsHandler, ListDoctorsHandler, ListPatientAppointmentsHandler,
};
pub use auth::{
    CurrentUserHandler, CurrentUserQuery, LoginCommand, LoginHandler, LoginResult, LogoutHandler,
    LogoutResult, RefreshTokenHandler, RegisterCommand, RegisterHandler, RegisterResult,
};
