//! Appointment list queries for the doctor and patient dashboards.

use serde::Deserialize;

use crate::application::pipeline::RequestPipeline;
use crate::application::ClientError;
use crate::domain::appointment::Appointment;

/// A bare array or `{ appointments: [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum AppointmentList {
    Wrapped { appointments: Vec<Appointment> },
    Bare(Vec<Appointment>),
}

impl AppointmentList {
    fn into_vec(self) -> Vec<Appointment> {
        match self {
            AppointmentList::Wrapped { appointments } | AppointmentList::Bare(appointments) => appointments,
        }
    }
}

async fn list(pipeline: &RequestPipeline, path: &str) -> Result<Vec<Appointment>, ClientError> {
    Ok(pipeline.get::<AppointmentList>(path).await?.into_vec())
}

/// `GET /appointments/doctor`: the signed-in doctor's schedule.
pub struct ListDoctorAppointmentsHandler {
    pipeline: RequestPipeline,
}

impl ListDoctorAppointmentsHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self) -> Result<Vec<Appointment>, ClientError> {
        list(&self.pipeline, "/appointments/doctor").await
    }
}

/// `GET /appointments/patient`: the signed-in patient's bookings.
pub struct ListPatientAppointmentsHandler {
    pipeline: RequestPipeline,
}

impl ListPatientAppointmentsHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self) -> Result<Vec<Appointment>, ClientError> {
        list(&self.pipeline, "/appointments/patient").await
    }
}
