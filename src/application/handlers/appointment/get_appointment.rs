//! GetAppointmentHandler - loads one appointment.

use super::AppointmentPayload;
use crate::application::pipeline::RequestPipeline;
use crate::application::ClientError;
use crate::domain::appointment::Appointment;
use crate::domain::foundation::AppointmentId;

#[derive(Debug, Clone)]
pub struct GetAppointmentQuery {
    pub id: AppointmentId,
}

pub struct GetAppointmentHandler {
    pipeline: RequestPipeline,
}

impl GetAppointmentHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self, query: GetAppointmentQuery) -> Result<Appointment, ClientError> {
        let path = format!("/appointments/{}", query.id);
        Ok(self.pipeline.get::<AppointmentPayload>(&path).await?.into_appointment())
    }
}
