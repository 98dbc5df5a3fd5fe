//! Client-side list of appointments for the current dashboard.

use std::fmt;
use std::str::FromStr;

use super::{Appointment, AppointmentStatus};
use crate::domain::foundation::{AppointmentId, ValidationError};

/// Status filter applied to the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AppointmentStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AppointmentStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Events that change the appointment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentEvent {
    FetchStart,
    FetchSuccess(Vec<Appointment>),
    FetchFailure(String),
    CreateStart,
    CreateSuccess(Appointment),
    CreateFailure(String),
    UpdateStart,
    UpdateSuccess(Appointment),
    UpdateFailure(String),
    DeleteStart,
    DeleteSuccess(AppointmentId),
    DeleteFailure(String),
    Select(Appointment),
    ClearSelection,
    SetFilter(StatusFilter),
    ClearError,
}

/// Appointments fetched for the current view, plus selection and filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppointmentBook {
    pub appointments: Vec<Appointment>,
    pub selected: Option<Appointment>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: StatusFilter,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event in place.
    pub fn apply(&mut self, event: AppointmentEvent) {
        match event {
            AppointmentEvent::FetchStart
            | AppointmentEvent::CreateStart
            | AppointmentEvent::UpdateStart
            | AppointmentEvent::DeleteStart => {
                self.loading = true;
                self.error = None;
            }
            AppointmentEvent::FetchFailure(message)
            | AppointmentEvent::CreateFailure(message)
            | AppointmentEvent::UpdateFailure(message)
            | AppointmentEvent::DeleteFailure(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            AppointmentEvent::FetchSuccess(appointments) => {
                self.finish();
                self.appointments = appointments;
            }
            AppointmentEvent::CreateSuccess(appointment) => {
                self.finish();
                self.appointments.push(appointment);
            }
            AppointmentEvent::UpdateSuccess(appointment) => {
                self.finish();
                if let Some(slot) = self.appointments.iter_mut().find(|a| a.id == appointment.id) {
                    *slot = appointment.clone();
                }
                if self.selected.as_ref().map(|s| &s.id) == Some(&appointment.id) {
                    self.selected = Some(appointment);
                }
            }
            AppointmentEvent::DeleteSuccess(id) => {
                self.finish();
                self.appointments.retain(|a| a.id != id);
            }
            AppointmentEvent::Select(appointment) => self.selected = Some(appointment),
            AppointmentEvent::ClearSelection => self.selected = None,
            AppointmentEvent::SetFilter(filter) => self.filter = filter,
            AppointmentEvent::ClearError => self.error = None,
        }
    }

    /// Appointments passing the current filter, in list order.
    pub fn visible(&self) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|a| self.filter.matches(a.status))
            .collect()
    }

    fn finish(&mut self) {
        self.loading = false;
        self.error = None;
    }
}
