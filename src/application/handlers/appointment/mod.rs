//! Appointment command and query handlers.

mod cancel_appointment;
mod create_appointment;
mod get_appointment;
mod list_appointments;
mod list_doctors;

pub use cancel_appointment::{CancelAppointmentCommand, CancelAppointmentHandler};
pub use create_appointment::{CreateAppointmentCommand, CreateAppointmentHandler};
pub use get_appointment::{GetAppointmentHandler, GetAppointmentQuery};
pub use list_appointments::{
    ListDoctorAppointmentsHandler, ListPatientAppointmentsHandler,
};
pub use list_doctors::ListDoctorsHandler;

use serde::Deserialize;

use crate::domain::appointment::Appointment;

/// `{ appointment }` or a bare appointment.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum AppointmentPayload {
    Wrapped { appointment: Appointment },
    Bare(Appointment),
}

impl AppointmentPayload {
    pub(crate) fn into_appointment(self) -> Appointment {
        match self {
            AppointmentPayload::Wrapped { appointment } | AppointmentPayload::Bare(appointment) => {
                appointment
            }
        }
    }
}
