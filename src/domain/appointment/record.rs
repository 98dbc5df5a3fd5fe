//! Appointment payload as transported to and from the backend.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{AppointmentId, ValidationError};

/// Lifecycle status of an appointment, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }

    /// Whether a cancellation request makes sense from the client side.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            "completed" => Ok(AppointmentStatus::Completed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// Reference to the doctor or patient on an appointment.
///
/// Listing endpoints populate the referenced profile; others send only the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartyRef {
    Id(String),
    Profile(PartyProfile),
}

impl PartyRef {
    pub fn id(&self) -> Option<&str> {
        match self {
            PartyRef::Id(id) => Some(id),
            PartyRef::Profile(p) => p.id(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            PartyRef::Id(id) => id,
            PartyRef::Profile(p) => p
                .name
                .as_deref()
                .or(p.email.as_deref())
                .or(p.id())
                .unwrap_or("unknown"),
        }
    }
}

/// Populated profile attached to an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
}

impl PartyProfile {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().or(self.document_id.as_deref())
    }
}

/// A booked appointment.
///
/// This client only transports appointments; it does not enforce scheduling
/// rules on what the backend returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAppointment")]
pub struct Appointment {
    pub id: AppointmentId,
    pub doctor: Option<PartyRef>,
    pub patient: Option<PartyRef>,
    #[serde(serialize_with = "calendar_date::serialize")]
    pub date: NaiveDate,
    #[serde(rename = "start", serialize_with = "clock_time::serialize")]
    pub start_time: NaiveTime,
    #[serde(rename = "end", serialize_with = "clock_time::serialize")]
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
struct RawAppointment {
    #[serde(default)]
    id: Option<AppointmentId>,
    #[serde(default, rename = "_id")]
    document_id: Option<AppointmentId>,
    #[serde(default)]
    doctor: Option<PartyRef>,
    #[serde(default)]
    patient: Option<PartyRef>,
    #[serde(deserialize_with = "calendar_date::deserialize")]
    date: NaiveDate,
    #[serde(alias = "startTime", deserialize_with = "clock_time::deserialize")]
    start: NaiveTime,
    #[serde(alias = "endTime", deserialize_with = "clock_time::deserialize")]
    end: NaiveTime,
    status: AppointmentStatus,
    #[serde(default)]
    notes: Option<String>,
}

impl TryFrom<RawAppointment> for Appointment {
    type Error = ValidationError;

    fn try_from(raw: RawAppointment) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.document_id)
            .ok_or_else(|| ValidationError::empty_field("appointment_id"))?;
        Ok(Self {
            id,
            doctor: raw.doctor,
            patient: raw.patient,
            date: raw.date,
            start_time: raw.start,
            end_time: raw.end,
            status: raw.status,
            notes: raw.notes,
        })
    }
}

/// `YYYY-MM-DD` calendar dates. Full ISO timestamps are truncated to the date.
pub(crate) mod calendar_date {
    use super::*;

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Result<NaiveDate, ValidationError> {
        let head = value.get(..10).unwrap_or(value);
        NaiveDate::parse_from_str(head, FORMAT)
            .map_err(|_| ValidationError::invalid_format("date", "expected YYYY-MM-DD"))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// `HH:mm` wall-clock times.
pub(crate) mod clock_time {
    use super::*;

    pub const FORMAT: &str = "%H:%M";

    /// Strict `HH:mm` (two-digit hour 00-23, two-digit minute).
    pub fn parse_strict(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
        let bytes = value.as_bytes();
        let shaped = bytes.len() == 5
            && bytes[2] == b':'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 2 || b.is_ascii_digit());
        if !shaped {
            return Err(ValidationError::invalid_format(field, "expected HH:mm"));
        }
        NaiveTime::parse_from_str(value, FORMAT)
            .map_err(|_| ValidationError::invalid_format(field, "expected HH:mm"))
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    /// Lenient on input: the backend sometimes appends seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
