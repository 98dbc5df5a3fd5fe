//! ListDoctorsHandler - doctors available for booking.

use serde::Deserialize;

use crate::application::pipeline::RequestPipeline;
use crate::application::ClientError;
use crate::domain::appointment::PartyProfile;

#[derive(Deserialize)]
#[serde(untagged)]
enum DoctorList {
    Wrapped { doctors: Vec<PartyProfile> },
    Bare(Vec<PartyProfile>),
}

pub struct ListDoctorsHandler {
    pipeline: RequestPipeline,
}

impl ListDoctorsHandler {
    pub fn new(pipeline: RequestPipeline) -> Self {
        Self { pipeline }
    }

    pub async fn handle(&self) -> Result<Vec<PartyProfile>, ClientError> {
        let doctors = match self.pipeline.get::<DoctorList>("/doctors").await? {
            DoctorList::Wrapped { doctors } | DoctorList::Bare(doctors) => doctors,
        };
        Ok(doctors)
    }
}
