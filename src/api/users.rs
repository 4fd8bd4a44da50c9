//! User directory and approval endpoints.

use crate::api::client::ApiClient;
use crate::errors::ClientError;
use crate::handlers::events;
use crate::models::all_models::{Appointment, Identity, Prescription};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//Update User Request
#[derive(Debug, Serialize, Default)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

//Patient Details Response
#[derive(Debug, Deserialize)]
pub struct PatientDetails {
    pub user: Identity,
    pub appointments: Vec<Appointment>,
    pub prescriptions: Vec<Prescription>,
}

#[derive(Debug, Deserialize)]
pub struct DeletedUserResponse {
    pub user_id: Uuid,
}

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<Identity>, ClientError> {
        self.get("/users").await
    }

    pub async fn list_doctors(&self) -> Result<Vec<Identity>, ClientError> {
        self.get("/users/doctors").await
    }

    pub async fn list_patients(&self) -> Result<Vec<Identity>, ClientError> {
        self.get("/users/patients").await
    }

    pub async fn list_pharmacists(&self) -> Result<Vec<Identity>, ClientError> {
        self.get("/users/pharmacists").await
    }

    /// Accounts awaiting the administrator approval flag.
    pub async fn list_pending_approval(&self) -> Result<Vec<Identity>, ClientError> {
        self.get("/users/pending-approval").await
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Identity, ClientError> {
        self.get(&format!("/users/{}", user_id)).await
    }

    pub async fn get_patient_details(&self, user_id: Uuid) -> Result<PatientDetails, ClientError> {
        self.get(&format!("/users/patient/{}/details", user_id)).await
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        payload: UpdateUserRequest,
    ) -> Result<Identity, ClientError> {
        self.put(&format!("/users/{}", user_id), &payload).await
    }

    //Approve User
    //Flips the approval flag (once, server-side) and tells viewers of that
    //role the account is now usable.
    pub async fn approve_user(&self, user_id: Uuid) -> Result<Identity, ClientError> {
        let approved: Identity = self.put_empty(&format!("/users/{}/approve", user_id)).await?;
        events::user_approved(&self.notifications, &approved);
        Ok(approved)
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<DeletedUserResponse, ClientError> {
        self.delete(&format!("/users/{}", user_id)).await
    }
}
