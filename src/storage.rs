//! Durable client-side storage for the session.
//!
//! Exactly two keys are ever stored: `token` (opaque string) and `user`
//! (serialized identity). They are written together and cleared together so
//! a reload can never observe one without the other.

use crate::errors::ClientError;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    /// Writes every pair in one atomic operation.
    fn set_many(&self, pairs: &[(&str, String)]) -> Result<(), ClientError>;
    /// Removes every named key in one atomic operation. Missing keys are
    /// not an error.
    fn remove_many(&self, keys: &[&str]) -> Result<(), ClientError>;
}

/// JSON-file-backed storage, the desktop analog of browser local storage.
pub struct FileStorage {
    path: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Result<Self, ClientError> {
        let cache = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<HashMap<String, String>>(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Session file {} is corrupt, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(ClientError::Storage(e)),
        };

        Ok(FileStorage {
            path,
            cache: Mutex::new(cache),
        })
    }

    // Serializes the whole map and replaces the file via a temp rename so a
    // crash mid-write cannot leave a half-written session.
    fn flush(&self, map: &HashMap<String, String>) -> Result<(), ClientError> {
        let contents = serde_json::to_string_pretty(map)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Session storage flushed to {}", self.path.display());
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.lock().unwrap().get(key).cloned()
    }

    fn set_many(&self, pairs: &[(&str, String)]) -> Result<(), ClientError> {
        let mut map = self.cache.lock().unwrap();
        for (key, value) in pairs {
            map.insert((*key).to_string(), value.clone());
        }
        self.flush(&map)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut map = self.cache.lock().unwrap();
        for key in keys {
            map.remove(*key);
        }
        self.flush(&map)
    }
}

/// In-memory storage for tests and the demo binary.
#[derive(Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap().get(key).cloned()
    }

    fn set_many(&self, pairs: &[(&str, String)]) -> Result<(), ClientError> {
        let mut map = self.map.lock().unwrap();
        for (key, value) in pairs {
            map.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut map = self.map.lock().unwrap();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
