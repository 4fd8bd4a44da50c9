//! Role-scoped notification store.
//!
//! Holds the ordered list of ephemeral notices and computes the subset a
//! given viewer may see. The store retains every notice regardless of
//! viewer; filtering happens at read time. Nothing here is persisted, so a
//! restart always yields an empty store.

use crate::models::all_models::{Notice, NoticeKind, UserRole};
use chrono::{DateTime, Utc};
use log::debug;
use std::sync::{Arc, Mutex};
use strum::IntoEnumIterator;

/// Two notices with identical title and message landing within this window
/// are treated as one emission (re-render loops, redundant fetches).
pub const DUPLICATE_WINDOW_MS: i64 = 2000;

/// Candidate notice before the store assigns an id and resolves the
/// default role target.
#[derive(Debug, Clone)]
pub struct NoticeDraft {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    /// None broadcasts to every role. Correct only for screen-navigation
    /// announcements; state changes about a specific party must target
    /// explicitly.
    pub for_roles: Option<Vec<UserRole>>,
}

impl NoticeDraft {
    pub fn new(kind: NoticeKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        NoticeDraft {
            kind,
            title: title.into(),
            message: message.into(),
            for_roles: None,
        }
    }

    pub fn for_roles(mut self, roles: Vec<UserRole>) -> Self {
        self.for_roles = Some(roles);
        self
    }
}

/// Shared notification store, cheap to clone and hand to every screen.
#[derive(Clone, Default)]
pub struct NotificationStore {
    inner: Arc<Mutex<Vec<Notice>>>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a notice and returns its id, or None when the draft was
    /// suppressed as a duplicate.
    pub fn add(&self, draft: NoticeDraft) -> Option<i64> {
        self.add_at(draft, Utc::now())
    }

    // Clock injected so the duplicate window is testable without sleeping.
    pub(crate) fn add_at(&self, draft: NoticeDraft, now: DateTime<Utc>) -> Option<i64> {
        let mut notices = self.inner.lock().unwrap();

        // Content + recency only; ids are not consulted.
        let duplicate = notices.iter().any(|n| {
            n.title == draft.title
                && n.message == draft.message
                && (now - n.created_at).num_milliseconds() < DUPLICATE_WINDOW_MS
        });
        if duplicate {
            debug!("Suppressed duplicate notice: {}", draft.title);
            return None;
        }

        // Creation timestamp doubles as id and sort key. When the clock has
        // not advanced past the previous notice, nudge forward so ids stay
        // strictly increasing.
        let mut id = now.timestamp_millis();
        if let Some(last) = notices.last() {
            if id <= last.id {
                id = last.id + 1;
            }
        }

        let for_roles = match draft.for_roles {
            Some(roles) if !roles.is_empty() => roles,
            _ => UserRole::iter().collect(),
        };

        notices.push(Notice {
            id,
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            for_roles,
            created_at: now,
        });
        Some(id)
    }

    /// Removes the matching notice; a second call with the same id is a
    /// no-op.
    pub fn remove(&self, id: i64) -> bool {
        let mut notices = self.inner.lock().unwrap();
        let before = notices.len();
        notices.retain(|n| n.id != id);
        notices.len() != before
    }

    /// Notices visible to the viewer, in insertion order. No active
    /// identity means an empty feed.
    pub fn visible(&self, viewer: Option<UserRole>) -> Vec<Notice> {
        let role = match viewer {
            Some(role) => role,
            None => return Vec::new(),
        };
        self.inner
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.for_roles.contains(&role))
            .cloned()
            .collect()
    }

    /// Clears every notice the viewer can see, as repeated single removal.
    /// Notices targeted away from this role are untouched.
    pub fn clear_all(&self, viewer: UserRole) {
        let ids: Vec<i64> = self
            .visible(Some(viewer))
            .into_iter()
            .map(|n| n.id)
            .collect();
        for id in ids {
            self.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}
