//! Validated request to book an appointment.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use super::record::{calendar_date, clock_time};
use crate::domain::foundation::{DoctorId, ValidationError};

/// Maximum length of the free-text note attached to a booking.
pub const MAX_NOTES_LEN: usize = 200;

/// A booking request that passed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAppointment {
    pub doctor: DoctorId,
    #[serde(serialize_with = "calendar_date::serialize")]
    pub date: NaiveDate,
    #[serde(serialize_with = "clock_time::serialize")]
    pub start: NaiveTime,
    #[serde(serialize_with = "clock_time::serialize")]
    pub end: NaiveTime,
    pub notes: String,
}

impl NewAppointment {
    /// Parses and validates raw form input.
    ///
    /// `today` is the caller's current calendar date; bookings in the past
    /// are rejected.
    pub fn parse(
        doctor: &str,
        date: &str,
        start: &str,
        end: &str,
        notes: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let doctor = DoctorId::new(doctor.trim()).map_err(|_| ValidationError::empty_field("doctor"))?;
        if date.trim().is_empty() {
            return Err(ValidationError::empty_field("date"));
        }
        let date = NaiveDate::parse_from_str(date.trim(), calendar_date::FORMAT)
            .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))?;
        let start = clock_time::parse_strict("start", start.trim())?;
        let end = clock_time::parse_strict("end", end.trim())?;

        let appointment = Self {
            doctor,
            date,
            start,
            end,
            notes: notes.unwrap_or_default().to_string(),
        };
        appointment.validate(today)?;
        Ok(appointment)
    }

    /// Checks the scheduling rules against `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.date < today {
            return Err(ValidationError::invalid_format("date", "cannot book a past date"));
        }
        if self.end <= self.start {
            return Err(ValidationError::invalid_format("end", "must be after start"));
        }
        let notes_len = self.notes.chars().count();
        if notes_len > MAX_NOTES_LEN {
            return Err(ValidationError::out_of_range("notes", 0, MAX_NOTES_LEN, notes_len));
        }
        Ok(())
    }
}
