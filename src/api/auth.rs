//! Auth endpoints: login, register, profile.

use crate::api::client::ApiClient;
use crate::errors::ClientError;
use crate::handlers::events;
use crate::models::all_models::{AuthResponse, Identity, UserRole};
use serde::Serialize;

//Login Request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

//Register Request
#[derive(Debug, Serialize, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

//Profile Update Request
#[derive(Debug, Serialize, Default)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

/// Client-side checks run before any request leaves the machine.
pub fn validate_registration(payload: &RegisterRequest) -> Result<(), ClientError> {
    if payload.name.trim().is_empty() {
        return Err(ClientError::Validation("Name is required".into()));
    }
    if payload.email.trim().is_empty() || !payload.email.contains('@') {
        return Err(ClientError::Validation("A valid email is required".into()));
    }
    if payload.password.is_empty() {
        return Err(ClientError::Validation("Password is required".into()));
    }
    if payload.password != payload.confirm_password {
        return Err(ClientError::Validation("Passwords do not match".into()));
    }
    if payload.role == UserRole::Doctor && payload.specialization.is_none() {
        return Err(ClientError::Validation(
            "Doctors must provide a specialization".into(),
        ));
    }
    Ok(())
}

// The auth service reports infrastructure trouble with a distinguishable
// payload so the UI can show remediation instead of "invalid credentials".
fn map_auth_error(status: u16, message: &str) -> ClientError {
    if message.contains("DATABASE_CONNECTION_ERROR") {
        return ClientError::DatabaseUnavailable;
    }
    match status {
        400 | 401 => ClientError::InvalidCredentials,
        _ => ClientError::Api {
            status,
            message: message.to_string(),
        },
    }
}

impl ApiClient {
    //Login
    //Login Input: email, password
    //Login Output: Identity (session stored, welcome notice emitted)
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = match self.post_public("/auth/login", &payload).await {
            Ok(auth) => auth,
            Err(ClientError::Api { status, message }) => {
                return Err(map_auth_error(status, &message))
            }
            Err(e) => return Err(e),
        };
        self.session.complete_login(auth)
    }

    //Register
    //Register Input: RegisterRequest
    //Register Output: Identity (session stored; non-patient roles told they
    //await approval, and admins notified)
    pub async fn register(&self, payload: RegisterRequest) -> Result<Identity, ClientError> {
        validate_registration(&payload)?;

        let auth: AuthResponse = match self.post_public("/auth/register", &payload).await {
            Ok(auth) => auth,
            Err(ClientError::Api { status, message }) => {
                return Err(map_auth_error(status, &message))
            }
            Err(e) => return Err(e),
        };

        let identity = self.session.complete_registration(auth)?;
        if identity.needs_approval() {
            events::registration_pending(&self.notifications, &identity);
        }
        Ok(identity)
    }

    //Get Profile
    pub async fn get_profile(&self) -> Result<Identity, ClientError> {
        self.get("/auth/profile").await
    }

    //Update Profile
    //Persists the server's returned record into the session and returns
    //it, so normalized or rejected fields never linger locally.
    pub async fn update_profile(
        &self,
        payload: UpdateProfileRequest,
    ) -> Result<Identity, ClientError> {
        let updated: Identity = self.put("/auth/profile", &payload).await?;
        self.session.replace_identity(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            name: "Sam Rivera".into(),
            email: "sam@carelink.test".into(),
            password: "hunter22".into(),
            confirm_password: "hunter22".into(),
            role: UserRole::Patient,
            specialization: None,
            license_number: None,
        }
    }

    #[test]
    fn mismatched_passwords_rejected_before_any_request() {
        let mut payload = request();
        payload.confirm_password = "hunter23".into();
        assert!(matches!(
            validate_registration(&payload),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn doctor_without_specialization_rejected() {
        let mut payload = request();
        payload.role = UserRole::Doctor;
        assert!(validate_registration(&payload).is_err());

        payload.specialization = Some("Pediatrics".into());
        assert!(validate_registration(&payload).is_ok());
    }

    #[test]
    fn database_down_is_distinguished_from_bad_credentials() {
        let e = map_auth_error(500, r#"{"error":"DATABASE_CONNECTION_ERROR"}"#);
        assert!(matches!(e, ClientError::DatabaseUnavailable));

        let e = map_auth_error(401, "Invalid credentials");
        assert!(matches!(e, ClientError::InvalidCredentials));
    }
}
