//! Prescription endpoints.

use crate::api::client::ApiClient;
use crate::errors::ClientError;
use crate::handlers::cache::EntityCache;
use crate::handlers::events;
use crate::models::all_models::{MedicationItem, Prescription, PrescriptionStatus};
use serde::Serialize;
use uuid::Uuid;

//Create Prescription Request
#[derive(Debug, Serialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: Uuid,
    pub appointment_id: Option<Uuid>,
    pub diagnosis: String,
    pub medications: Vec<MedicationItem>,
    pub notes: Option<String>,
}

//Update Prescription Request
#[derive(Debug, Serialize, Default)]
pub struct UpdatePrescriptionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PrescriptionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Every medication row must name the drug and its dosage before the
/// request is sent.
pub fn validate_medications(rows: &[MedicationItem]) -> Result<(), ClientError> {
    if rows.is_empty() {
        return Err(ClientError::Validation(
            "At least one medication is required".into(),
        ));
    }
    if rows.iter().any(|row| !row.is_complete()) {
        return Err(ClientError::Validation(
            "Every medication row needs a name and a dosage".into(),
        ));
    }
    Ok(())
}

impl ApiClient {
    pub async fn list_prescriptions(
        &self,
        cache: &EntityCache<Prescription>,
    ) -> Result<Vec<Prescription>, ClientError> {
        let prescriptions: Vec<Prescription> = self.get("/prescriptions").await?;
        cache.replace_all(prescriptions.clone());
        Ok(prescriptions)
    }

    pub async fn get_prescription(
        &self,
        prescription_id: Uuid,
    ) -> Result<Prescription, ClientError> {
        self.get(&format!("/prescriptions/{}", prescription_id)).await
    }

    pub async fn create_prescription(
        &self,
        cache: &EntityCache<Prescription>,
        payload: CreatePrescriptionRequest,
    ) -> Result<Prescription, ClientError> {
        if payload.diagnosis.trim().is_empty() {
            return Err(ClientError::Validation("A diagnosis is required".into()));
        }
        validate_medications(&payload.medications)?;

        let created: Prescription = self.post("/prescriptions", &payload).await?;
        cache.upsert(created.clone());
        events::prescription_created(&self.notifications, &created);
        Ok(created)
    }

    pub async fn update_prescription(
        &self,
        cache: &EntityCache<Prescription>,
        prescription_id: Uuid,
        payload: UpdatePrescriptionRequest,
    ) -> Result<Prescription, ClientError> {
        let updated: Prescription = self
            .put(&format!("/prescriptions/{}", prescription_id), &payload)
            .await?;
        cache.upsert(updated.clone());
        if updated.status == PrescriptionStatus::Dispensed {
            events::prescription_dispensed(&self.notifications, &updated);
        }
        Ok(updated)
    }
}
