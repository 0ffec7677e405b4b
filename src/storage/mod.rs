//! Storage layer for TaskFlow data.
//!
//! This module handles persistence of the user directory, projects, tasks,
//! comments and the current session user.
//!
//! ## Layout
//!
//! Every collection lives under one fixed key as a JSON array, rewritten
//! wholesale on each save:
//!
//! - `tf_users_db` - user directory (records include the credential)
//! - `tf_projects`, `tf_tasks`, `tf_comments` - entity collections
//! - `tf_user` - the signed-in user, credential stripped; absent when signed out
//!
//! ## Failure policy
//!
//! Loads never fail: a missing or malformed entry reads as absent. Saves and
//! removes never fail either; errors (I/O, quota) are logged as warnings and
//! the in-memory state stays authoritative.

pub mod backend;

pub use backend::{BackendType, FileStore, KeyValueStore, MemoryStore};

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use tracing::{debug, warn};

/// User directory, including credentials.
pub const USERS_DB_KEY: &str = "tf_users_db";
/// Signed-in user.
pub const SESSION_USER_KEY: &str = "tf_user";
pub const PROJECTS_KEY: &str = "tf_projects";
pub const TASKS_KEY: &str = "tf_tasks";
pub const COMMENTS_KEY: &str = "tf_comments";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "TF_DATA_DIR";

/// Typed load/save over a [`KeyValueStore`].
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// In-memory persistence (tests, throwaway boards).
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Deserialize the entry under `key`.
    ///
    /// Returns `None` when the entry is absent, unreadable or malformed.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "failed to read stored entry, treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "malformed stored entry, treating as absent");
                None
            }
        }
    }

    /// Like [`load`](Self::load), falling back to `default`.
    pub fn load_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.load(key).unwrap_or(default)
    }

    /// Whether an entry exists under `key` (regardless of whether it parses).
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.store.get(key), Ok(Some(_)))
    }

    /// Serialize `value` and write it under `key`, replacing prior content.
    ///
    /// Returns whether the write succeeded. Failures are logged, never raised.
    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> bool {
        match self.try_save(key, value) {
            Ok(()) => {
                debug!(key, "saved");
                true
            }
            Err(e) => {
                warn!(key, error = %e, "failed to persist entry; in-memory state kept");
                false
            }
        }
    }

    fn try_save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, &json)
    }

    /// Delete the entry under `key`. Failures are logged, never raised.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.store.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "failed to remove stored entry");
                false
            }
        }
    }

    /// Get the storage location description (for display purposes).
    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn backend_type(&self) -> BackendType {
        self.store.backend_type()
    }
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("backend", &self.store.backend_type())
            .field("location", &self.store.location())
            .finish()
    }
}

/// Get the data directory for TaskFlow.
///
/// `TF_DATA_DIR` wins when set and non-empty; otherwise
/// `<platform data dir>/taskflow` (e.g. `~/.local/share/taskflow`).
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("taskflow"))
}

/// Generate a fresh entity identifier.
///
/// Format: `<prefix>-<12 hex chars>` from a random UUID, e.g. `t-3f2a9c0d41b7`.
pub fn generate_id(prefix: &str) -> String {
    let uuid = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &uuid[..12])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, timestamp};
    use serial_test::serial;

    fn sample_comments() -> Vec<Comment> {
        (0..3)
            .map(|i| Comment {
                id: format!("c{}", i),
                task_id: "t1".to_string(),
                user_id: "u1".to_string(),
                text: format!("comment {}", i),
                created_at: timestamp::now(),
            })
            .collect()
    }

    #[test]
    fn test_save_then_load_reproduces_collection() {
        let mut persistence = Persistence::in_memory();
        let comments = sample_comments();

        assert!(persistence.save(COMMENTS_KEY, &comments));
        let loaded: Vec<Comment> = persistence.load(COMMENTS_KEY).unwrap();
        assert_eq!(loaded, comments);
    }

    #[test]
    fn test_load_absent_is_none() {
        let persistence = Persistence::in_memory();
        assert!(persistence.load::<Vec<Comment>>(COMMENTS_KEY).is_none());
        assert!(!persistence.contains(COMMENTS_KEY));
    }

    #[test]
    fn test_load_malformed_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set(TASKS_KEY, "{not json").unwrap();
        let persistence = Persistence::new(Box::new(store));

        assert!(persistence.load::<Vec<Comment>>(TASKS_KEY).is_none());
        let fallback: Vec<Comment> = persistence.load_or(TASKS_KEY, Vec::new());
        assert!(fallback.is_empty());
        assert!(persistence.contains(TASKS_KEY));
    }

    #[test]
    fn test_save_over_quota_is_not_fatal() {
        let mut persistence = Persistence::new(Box::new(MemoryStore::with_quota(16)));
        assert!(!persistence.save(COMMENTS_KEY, &sample_comments()));
        assert!(persistence.load::<Vec<Comment>>(COMMENTS_KEY).is_none());
    }

    #[test]
    fn test_save_replaces_prior_content() {
        let mut persistence = Persistence::in_memory();
        let comments = sample_comments();
        persistence.save(COMMENTS_KEY, &comments);
        persistence.save(COMMENTS_KEY, &comments[..1]);

        let loaded: Vec<Comment> = persistence.load(COMMENTS_KEY).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut persistence = Persistence::in_memory();
        persistence.save(SESSION_USER_KEY, &serde_json::json!({"id": "u1"}));
        assert!(persistence.remove(SESSION_USER_KEY));
        assert!(!persistence.contains(SESSION_USER_KEY));
    }

    #[test]
    fn test_generate_id_format() {
        let id = generate_id("t");
        assert!(id.starts_with("t-"));
        assert_eq!(id.len(), 14);
        assert!(id[2..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_id("t"), generate_id("t"));
    }

    #[test]
    #[serial]
    fn test_data_dir_env_override() {
        // SAFETY: serialized with other env-touching tests via #[serial]
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/tf-data-test");
        }
        assert_eq!(get_data_dir().unwrap(), PathBuf::from("/tmp/tf-data-test"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
