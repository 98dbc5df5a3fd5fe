//! CancelAppointmentHandler - cancels a booked appointment.

use tracing::info;

use super::AppointmentPayload;
use crate::application::pipeline::RequestPipeline;
use crate::application::ClientError;
use crate::domain::appointment::Appointment;
use crate::domain::foundation::AppointmentId;

#[derive(Debug, Clone)]
pub struct CancelAppointmentCommand {
    pub id: AppointmentId,
}

pub struct CancelAppointmentHandler {
    pipeline: RequestPipeline,
}

impl CancelAppointmentHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self, cmd: CancelAppointmentCommand) -> Result<Appointment, ClientError> {
        let path = format!("/appointments/{}/cancel", cmd.id);
        let appointment = self.pipeline.patch::<AppointmentPayload>(&path).await?.into_appointment();
        info!(appointment_id = %appointment.id, status = %appointment.status, "Appointment cancelled");
        Ok(appointment)
    }
}
