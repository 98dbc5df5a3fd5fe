//! Appointment domain module.
//!
//! Appointments are owned by the backend. This module only models the
//! payloads, validates booking input before it is sent, and keeps the list
//! shown on a dashboard.

mod record;
mod book;
mod new_appointment;

pub use record::{Appointment, AppointmentStatus, PartyProfile, PartyRef};
pub use book::{AppointmentBook, AppointmentEvent, StatusFilter};
pub use new_appointment::{NewAppointment, MAX_NOTES_LEN};
