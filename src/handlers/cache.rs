//! Normalized client-side cache for domain entities.
//!
//! Screens read the same cache instead of holding private copies of "the
//! appointments", so an update applied after an API response is visible
//! everywhere at once. Keyed by entity id, insertion order preserved.

use crate::models::all_models::{Appointment, InventoryItem, Prescription};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub trait HasId {
    fn id(&self) -> Uuid;
}

impl HasId for Appointment {
    fn id(&self) -> Uuid {
        self.appointment_id
    }
}

impl HasId for Prescription {
    fn id(&self) -> Uuid {
        self.prescription_id
    }
}

impl HasId for InventoryItem {
    fn id(&self) -> Uuid {
        self.item_id
    }
}

#[derive(Clone)]
pub struct EntityCache<T> {
    inner: Arc<Mutex<CacheInner<T>>>,
}

struct CacheInner<T> {
    by_id: HashMap<Uuid, T>,
    order: Vec<Uuid>,
}

impl<T: HasId + Clone> Default for EntityCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: HasId + Clone> EntityCache<T> {
    pub fn new() -> Self {
        EntityCache {
            inner: Arc::new(Mutex::new(CacheInner {
                by_id: HashMap::new(),
                order: Vec::new(),
            })),
        }
    }

    /// Inserts or replaces in place; a replaced entity keeps its original
    /// position.
    pub fn upsert(&self, entity: T) {
        let mut inner = self.inner.lock().unwrap();
        let id = entity.id();
        if inner.by_id.insert(id, entity).is_none() {
            inner.order.push(id);
        }
    }

    /// Replaces the whole cache with a freshly fetched list.
    pub fn replace_all(&self, entities: Vec<T>) {
        let mut inner = self.inner.lock().unwrap();
        inner.by_id.clear();
        inner.order.clear();
        for entity in entities {
            let id = entity.id();
            if inner.by_id.insert(id, entity).is_none() {
                inner.order.push(id);
            }
        }
    }

    pub fn remove(&self, id: Uuid) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        let removed = inner.by_id.remove(&id);
        if removed.is_some() {
            inner.order.retain(|entry| *entry != id);
        }
        removed
    }

    pub fn get(&self, id: Uuid) -> Option<T> {
        self.inner.lock().unwrap().by_id.get(&id).cloned()
    }

    pub fn all(&self) -> Vec<T> {
        let inner = self.inner.lock().unwrap();
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    pub fn filter<F: Fn(&T) -> bool>(&self, predicate: F) -> Vec<T> {
        self.all().into_iter().filter(|e| predicate(e)).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
