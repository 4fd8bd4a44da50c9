//! Session store: single source of truth for who is acting now.
//!
//! The identity and bearer token are persisted together through a
//! `SessionStorage` backend so a reload can pick the session back up, and
//! cleared together on logout or a rejected request.

use crate::errors::ClientError;
use crate::handlers::notifications::{NoticeDraft, NotificationStore};
use crate::models::all_models::{AuthResponse, Identity, NoticeKind, UserRole};
use crate::storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use log::{info, warn};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Storage has not been read yet. The route guard renders a
    /// placeholder in this state rather than redirecting.
    Loading,
    Anonymous,
    Active(ActiveSession),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSession {
    pub identity: Identity,
    pub token: String,
}

/// Partial profile edit merged into the active identity.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
}

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    storage: Arc<dyn SessionStorage>,
    notifications: NotificationStore,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, notifications: NotificationStore) -> Self {
        SessionStore {
            state: Arc::new(Mutex::new(SessionState::Loading)),
            storage,
            notifications,
        }
    }

    /// Loads the persisted session, resolving the Loading state. A missing
    /// or unreadable record yields Anonymous and clears both keys.
    pub fn hydrate(&self) -> Result<(), ClientError> {
        let token = self.storage.get(TOKEN_KEY);
        let user = self.storage.get(USER_KEY);

        let next = match (token, user) {
            (Some(token), Some(user_json)) => {
                match serde_json::from_str::<Identity>(&user_json) {
                    Ok(identity) => {
                        info!("Session hydrated for {} ({})", identity.name, identity.role);
                        SessionState::Active(ActiveSession { identity, token })
                    }
                    Err(e) => {
                        warn!("Stored user record is unreadable, clearing session: {}", e);
                        self.storage.remove_many(&[TOKEN_KEY, USER_KEY])?;
                        SessionState::Anonymous
                    }
                }
            }
            _ => SessionState::Anonymous,
        };

        *self.state.lock().unwrap() = next;
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state.lock().unwrap().clone()
    }

    pub fn current(&self) -> Option<Identity> {
        match &*self.state.lock().unwrap() {
            SessionState::Active(session) => Some(session.identity.clone()),
            _ => None,
        }
    }

    pub fn token(&self) -> Option<String> {
        match &*self.state.lock().unwrap() {
            SessionState::Active(session) => Some(session.token.clone()),
            _ => None,
        }
    }

    pub fn role(&self) -> Option<UserRole> {
        self.current().map(|identity| identity.role)
    }

    /// Stores a successful login response: token and user persisted in one
    /// write, state set active, welcome notice targeted at the new
    /// identity's role. Last response wins if two logins race.
    pub fn complete_login(&self, auth: AuthResponse) -> Result<Identity, ClientError> {
        let identity = self.persist(auth)?;
        self.notifications.add(
            NoticeDraft::new(
                NoticeKind::Success,
                "Welcome back",
                format!("Logged in as {}", identity.name),
            )
            .for_roles(vec![identity.role]),
        );
        Ok(identity)
    }

    /// Same as login, but non-patient accounts are told they must wait for
    /// administrator approval before the application is usable.
    pub fn complete_registration(&self, auth: AuthResponse) -> Result<Identity, ClientError> {
        let identity = self.persist(auth)?;
        let draft = if identity.needs_approval() {
            NoticeDraft::new(
                NoticeKind::Info,
                "Registration received",
                "Your account is pending administrator approval",
            )
        } else {
            NoticeDraft::new(
                NoticeKind::Success,
                "Registration complete",
                format!("Welcome, {}", identity.name),
            )
        };
        self.notifications.add(draft.for_roles(vec![identity.role]));
        Ok(identity)
    }

    fn persist(&self, auth: AuthResponse) -> Result<Identity, ClientError> {
        let user_json = serde_json::to_string(&auth.user)?;
        self.storage
            .set_many(&[(TOKEN_KEY, auth.token.clone()), (USER_KEY, user_json)])?;
        *self.state.lock().unwrap() = SessionState::Active(ActiveSession {
            identity: auth.user.clone(),
            token: auth.token,
        });
        Ok(auth.user)
    }

    /// Clears the session synchronously. No server round-trip.
    pub fn logout(&self) -> Result<(), ClientError> {
        let role = self.role();
        self.clear()?;
        if let Some(role) = role {
            self.notifications.add(
                NoticeDraft::new(NoticeKind::Info, "Signed out", "You have been signed out")
                    .for_roles(vec![role]),
            );
        }
        info!("Session cleared on logout");
        Ok(())
    }

    /// Used when a request comes back 401: clear the session and emit a
    /// single session-expired notice.
    pub fn force_logout(&self) -> Result<(), ClientError> {
        self.clear()?;
        self.notifications.add(NoticeDraft::new(
            NoticeKind::Error,
            "Session expired",
            "Your session has expired. Please log in again.",
        ));
        warn!("Session force-cleared after authentication rejection");
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        self.storage.remove_many(&[TOKEN_KEY, USER_KEY])?;
        *self.state.lock().unwrap() = SessionState::Anonymous;
        Ok(())
    }

    /// Replaces the stored identity with the server's record wholesale and
    /// re-persists it. Used after profile edits so the session cannot
    /// drift from what the backend actually accepted.
    pub fn replace_identity(&self, identity: Identity) -> Result<Identity, ClientError> {
        let mut state = self.state.lock().unwrap();
        let session = match &mut *state {
            SessionState::Active(session) => session,
            _ => {
                return Err(ClientError::Validation(
                    "No active session to update".to_string(),
                ))
            }
        };

        session.identity = identity;
        let user_json = serde_json::to_string(&session.identity)?;
        self.storage.set_many(&[
            (TOKEN_KEY, session.token.clone()),
            (USER_KEY, user_json),
        ])?;
        Ok(session.identity.clone())
    }

    /// Merges a partial profile edit into the active identity, re-persists
    /// it, and returns the merged record.
    pub fn update_user(&self, update: ProfileUpdate) -> Result<Identity, ClientError> {
        let mut state = self.state.lock().unwrap();
        let session = match &mut *state {
            SessionState::Active(session) => session,
            _ => {
                return Err(ClientError::Validation(
                    "No active session to update".to_string(),
                ))
            }
        };

        if let Some(name) = update.name {
            session.identity.name = name;
        }
        if let Some(email) = update.email {
            session.identity.email = email;
        }
        if let Some(specialization) = update.specialization {
            session.identity.specialization = Some(specialization);
        }
        if let Some(license_number) = update.license_number {
            session.identity.license_number = Some(license_number);
        }

        let user_json = serde_json::to_string(&session.identity)?;
        self.storage.set_many(&[
            (TOKEN_KEY, session.token.clone()),
            (USER_KEY, user_json),
        ])?;
        Ok(session.identity.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use uuid::Uuid;

    fn doctor_identity(approved: bool) -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            name: "Dr. Adams".into(),
            email: "adams@carelink.test".into(),
            role: UserRole::Doctor,
            is_approved: approved,
            specialization: Some("Dermatology".into()),
            license_number: Some("MD-2231".into()),
        }
    }

    fn store() -> (SessionStore, NotificationStore) {
        let notifications = NotificationStore::new();
        let session = SessionStore::new(Arc::new(MemoryStorage::new()), notifications.clone());
        (session, notifications)
    }

    #[test]
    fn starts_loading_until_hydrated() {
        let (session, _) = store();
        assert_eq!(session.state(), SessionState::Loading);
        session.hydrate().unwrap();
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn login_persists_and_survives_rehydration() {
        let storage = Arc::new(MemoryStorage::new());
        let notifications = NotificationStore::new();
        let session = SessionStore::new(storage.clone(), notifications.clone());

        session
            .complete_login(AuthResponse {
                token: "tok-1".into(),
                user: doctor_identity(true),
            })
            .unwrap();

        let rehydrated = SessionStore::new(storage, notifications);
        rehydrated.hydrate().unwrap();
        assert_eq!(rehydrated.role(), Some(UserRole::Doctor));
        assert_eq!(rehydrated.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn login_emits_welcome_notice_for_own_role() {
        let (session, notifications) = store();
        session
            .complete_login(AuthResponse {
                token: "tok".into(),
                user: doctor_identity(true),
            })
            .unwrap();

        assert_eq!(notifications.visible(Some(UserRole::Doctor)).len(), 1);
        assert!(notifications.visible(Some(UserRole::Patient)).is_empty());
    }

    #[test]
    fn registration_of_unapproved_doctor_mentions_approval() {
        let (session, notifications) = store();
        session
            .complete_registration(AuthResponse {
                token: "tok".into(),
                user: doctor_identity(false),
            })
            .unwrap();

        let feed = notifications.visible(Some(UserRole::Doctor));
        assert_eq!(feed.len(), 1);
        assert!(feed[0].message.contains("pending administrator approval"));
    }

    #[test]
    fn logout_clears_token_and_user_together() {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::new(storage.clone(), NotificationStore::new());
        session
            .complete_login(AuthResponse {
                token: "tok".into(),
                user: doctor_identity(true),
            })
            .unwrap();

        session.logout().unwrap();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());
    }

    #[test]
    fn update_user_merges_and_repersists() {
        let storage = Arc::new(MemoryStorage::new());
        let notifications = NotificationStore::new();
        let session = SessionStore::new(storage.clone(), notifications.clone());
        session
            .complete_login(AuthResponse {
                token: "tok".into(),
                user: doctor_identity(true),
            })
            .unwrap();

        let merged = session
            .update_user(ProfileUpdate {
                specialization: Some("Oncology".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(merged.specialization.as_deref(), Some("Oncology"));
        assert_eq!(merged.name, "Dr. Adams");

        let rehydrated = SessionStore::new(storage, notifications);
        rehydrated.hydrate().unwrap();
        assert_eq!(
            rehydrated.current().unwrap().specialization.as_deref(),
            Some("Oncology")
        );
    }

    #[test]
    fn replace_identity_persists_the_servers_record() {
        let storage = Arc::new(MemoryStorage::new());
        let notifications = NotificationStore::new();
        let session = SessionStore::new(storage.clone(), notifications.clone());
        session
            .complete_login(AuthResponse {
                token: "tok".into(),
                user: doctor_identity(true),
            })
            .unwrap();

        // The server normalized the email; the session must store exactly
        // what came back, not what was submitted.
        let mut from_server = doctor_identity(true);
        from_server.email = "a.adams@carelink.test".into();
        from_server.specialization = None;
        session.replace_identity(from_server.clone()).unwrap();

        assert_eq!(session.current(), Some(from_server.clone()));
        assert_eq!(session.token().as_deref(), Some("tok"));

        let rehydrated = SessionStore::new(storage, notifications);
        rehydrated.hydrate().unwrap();
        assert_eq!(rehydrated.current(), Some(from_server));
    }

    #[test]
    fn force_logout_clears_session_and_emits_single_expired_notice() {
        let storage = Arc::new(MemoryStorage::new());
        let notifications = NotificationStore::new();
        let session = SessionStore::new(storage.clone(), notifications.clone());
        session
            .complete_login(AuthResponse {
                token: "tok".into(),
                user: doctor_identity(true),
            })
            .unwrap();

        session.force_logout().unwrap();

        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(storage.get(TOKEN_KEY).is_none());
        assert!(storage.get(USER_KEY).is_none());

        let expired: Vec<_> = notifications
            .visible(Some(UserRole::Doctor))
            .into_iter()
            .filter(|n| n.kind == NoticeKind::Error && n.title == "Session expired")
            .collect();
        assert_eq!(expired.len(), 1);
    }

    #[test]
    fn update_without_session_is_rejected() {
        let (session, _) = store();
        session.hydrate().unwrap();
        let result = session.update_user(ProfileUpdate::default());
        assert!(matches!(result, Err(ClientError::Validation(_))));
    }
}
