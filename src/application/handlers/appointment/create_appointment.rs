//! CreateAppointmentHandler - books a new appointment.

use chrono::NaiveDate;
use tracing::info;

use super::AppointmentPayload;
use crate::application::pipeline::RequestPipeline;
use crate::application::ClientError;
use crate::domain::appointment::{Appointment, NewAppointment};

/// Raw booking form input.
#[derive(Debug, Clone)]
pub struct CreateAppointmentCommand {
    pub doctor: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub notes: Option<String>,
}

pub struct CreateAppointmentHandler {
    pipeline: RequestPipeline,
}

impl CreateAppointmentHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    /// Validates against `today` and posts the booking.
    pub async fn handle(&self, cmd: CreateAppointmentCommand, today: NaiveDate) -> Result<Appointment, ClientError> {
        let booking = NewAppointment::parse(
            &cmd.doctor,
            &cmd.date,
            &cmd.start,
            &cmd.end,
            cmd.notes.as_deref(),
            today,
        )?;

        let appointment = self
            .pipeline
            .post::<_, AppointmentPayload>("/appointments", &booking)
            .await?
            .into_appointment();

        info!(appointment_id = %appointment.id, doctor = %booking.doctor, "Appointment booked");
        Ok(appointment)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::{appointment_json, pipeline_as};
    use super::*;
    use crate::adapters::http::{MockReply, MockTransport};
    use crate::domain::appointment::AppointmentStatus;
    use crate::domain::foundation::Role;
    use http::Method;
    use serde_json::json;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    fn command() -> CreateAppointmentCommand {
        CreateAppointmentCommand {
            doctor: "d1".into(),
            date: "2025-11-03".into(),
            start: "09:30".into(),
            end: "10:00".into(),
            notes: Some("Follow-up".into()),
        }
    }

    #[tokio::test]
    async fn posts_backend_body_and_returns_appointment() {
        let transport = Arc::new(MockTransport::new().on(
            Method::POST,
            "/appointments",
            MockReply::json(201, json!({"success": true, "data": {"appointment": appointment_json("a1", "pending")}})),
        ));
        let handler = CreateAppointmentHandler::new(pipeline_as(Role::Patient, transport.clone()).await);

        let appointment = handler.handle(command(), today()).await.unwrap();

        assert_eq!(appointment.id.as_str(), "a1");
        assert_eq!(appointment.status, AppointmentStatus::Pending);
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({
                "doctor": "d1",
                "date": "2025-11-03",
                "start": "09:30",
                "end": "10:00",
                "notes": "Follow-up"
            }))
        );
    }

    #[tokio::test]
    async fn invalid_booking_is_not_sent() {
        let transport = Arc::new(MockTransport::new());
        let handler = CreateAppointmentHandler::new(pipeline_as(Role::Patient, transport.clone()).await);

        let mut cmd = command();
        cmd.end = "09:00".into();
        let err = handler.handle(cmd, today()).await.unwrap_err();

        assert!(matches!(err, ClientError::Validation(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn slot_conflict_is_surfaced() {
        let transport = Arc::new(MockTransport::new().on(
            Method::POST,
            "/appointments",
            MockReply::json(400, json!({"message": "Doctor is not available at this time"})),
        ));
        let handler = CreateAppointmentHandler::new(pipeline_as(Role::Patient, transport).await);

        let err = handler.handle(command(), today()).await.unwrap_err();
        assert_eq!(err.to_string(), "Doctor is not available at this time");
    }
}
