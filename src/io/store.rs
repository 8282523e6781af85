//! A small JSON key-value store in the OS config directory.
//!
//! The board autosaves here between sessions. Reads of unknown keys return
//! `None`; writes are flushed immediately and failures (quota, permissions,
//! serialization) are swallowed — the in-memory state stays authoritative
//! for the session.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub struct KvStore {
    path: PathBuf,
    data: serde_json::Map<String, Value>,
}

impl KvStore {
    /// Open the store in the OS config directory, creating it on first use.
    pub fn open() -> Self {
        let path = Self::default_path();
        Self::at(path)
    }

    /// Open a store backed by an explicit file (used by tests).
    pub fn at(path: PathBuf) -> Self {
        let data = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        Self { path, data }
    }

    fn default_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "Planboard") {
            proj_dirs.config_dir().join("store.json")
        } else {
            PathBuf::from(".").join("store.json")
        }
    }

    /// Directory holding the store file (for the "Open Data Folder" menu).
    pub fn dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Read and deserialize a value; malformed stored data reads as `None`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
        self.flush();
    }

    /// Serialize and store a value. Serialization failure leaves the old
    /// entry in place.
    pub fn set_as<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.set(key, v);
        }
    }

    fn flush(&self) {
        if let Ok(json) = serde_json::to_string_pretty(&self.data) {
            if let Some(parent) = self.path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(&self.path, json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_store() -> KvStore {
        let path = std::env::temp_dir().join(format!("planboard-test-{}.json", Uuid::new_v4()));
        KvStore::at(path)
    }

    #[test]
    fn unknown_keys_read_as_none() {
        let store = scratch_store();
        assert!(store.get("missing").is_none());
        assert_eq!(store.get_as::<i32>("missing"), None);
    }

    #[test]
    fn values_round_trip_through_disk() {
        let mut store = scratch_store();
        store.set_as("answer", &42i32);
        let reopened = KvStore::at(store.path.clone());
        assert_eq!(reopened.get_as::<i32>("answer"), Some(42));
        let _ = std::fs::remove_file(&store.path);
    }

    #[test]
    fn malformed_stored_value_reads_as_none() {
        let mut store = scratch_store();
        store.set("n", Value::String("not a number".into()));
        assert_eq!(store.get_as::<i32>("n"), None);
        let _ = std::fs::remove_file(&store.path);
    }
}
