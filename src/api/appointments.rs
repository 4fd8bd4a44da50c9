//! Appointment endpoints. Responses are folded into the shared entity
//! cache so every screen reads one source.

use crate::api::client::ApiClient;
use crate::errors::ClientError;
use crate::handlers::cache::EntityCache;
use crate::handlers::events;
use crate::models::all_models::{Appointment, AppointmentStatus};
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

//Create Appointment Request
#[derive(Debug, Serialize)]
pub struct CreateAppointmentRequest {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: String,
    pub reason: Option<String>,
}

//Update Appointment Request
#[derive(Debug, Serialize, Default)]
pub struct UpdateAppointmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct UpdateStatusRequest {
    status: AppointmentStatus,
}

impl ApiClient {
    /// Fetches the viewer's appointments and replaces the cache with them.
    pub async fn list_appointments(
        &self,
        cache: &EntityCache<Appointment>,
    ) -> Result<Vec<Appointment>, ClientError> {
        let appointments: Vec<Appointment> = self.get("/appointments").await?;
        cache.replace_all(appointments.clone());
        Ok(appointments)
    }

    pub async fn create_appointment(
        &self,
        cache: &EntityCache<Appointment>,
        payload: CreateAppointmentRequest,
    ) -> Result<Appointment, ClientError> {
        if payload.time_slot.trim().is_empty() {
            return Err(ClientError::Validation("A time slot is required".into()));
        }

        let created: Appointment = self.post("/appointments", &payload).await?;
        cache.upsert(created.clone());
        events::appointment_booked(&self.notifications, &created);
        Ok(created)
    }

    pub async fn update_appointment(
        &self,
        cache: &EntityCache<Appointment>,
        appointment_id: Uuid,
        payload: UpdateAppointmentRequest,
    ) -> Result<Appointment, ClientError> {
        let updated: Appointment = self
            .put(&format!("/appointments/{}", appointment_id), &payload)
            .await?;
        cache.upsert(updated.clone());
        Ok(updated)
    }

    //Update Appointment Status
    //Emits the staff-facing and patient-facing notices for the new status.
    pub async fn update_appointment_status(
        &self,
        cache: &EntityCache<Appointment>,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<Appointment, ClientError> {
        let updated: Appointment = self
            .put(
                &format!("/appointments/{}/status", appointment_id),
                &UpdateStatusRequest { status },
            )
            .await?;
        cache.upsert(updated.clone());
        events::appointment_status_changed(&self.notifications, &updated);
        Ok(updated)
    }
}
