// In: src/store.rs

//! Typed parameter persistence.
//!
//! The host application remembers workflow settings between invocations. This
//! module defines the narrow, typed contract the rest of the library talks to
//! (`ParameterStore`), replacing the stringly-keyed property bags hosts tend
//! to expose. Absence of a key is never an error: typed getters return `None`
//! and the caller keeps its default.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::StarflowError;

/// Typed load/save access to persisted workflow parameters.
///
/// Saves are fire-and-forget from the caller's perspective; a store that
/// buffers writes (like [`JsonFileStore`]) exposes its own flush mechanism.
pub trait ParameterStore {
    fn load_real(&self, key: &str) -> Option<f64>;
    fn load_bool(&self, key: &str) -> Option<bool>;
    fn load_string(&self, key: &str) -> Option<String>;

    fn save_real(&mut self, key: &str, value: f64);
    fn save_bool(&mut self, key: &str, value: bool);
    fn save_string(&mut self, key: &str, value: &str);
}

//==================================================================================
// I. In-Memory Store
//==================================================================================

/// A transient, process-local store. Used by tests and by embedding hosts
/// that persist settings through their own mechanism.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParameterStore for MemoryStore {
    fn load_real(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    fn load_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    fn load_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn save_real(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn save_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn save_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), Value::from(value));
    }
}

//==================================================================================
// II. JSON File Store
//==================================================================================

/// A store backed by a flat JSON object on disk.
///
/// `open` reads the whole file up front (a missing file yields an empty
/// store, matching the absence-means-default contract); `flush` writes the
/// current state back. Saves between flushes only mutate memory.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StarflowError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                // Tolerate a corrupt or foreign file by starting fresh.
                _ => Map::new(),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current parameter set back to disk.
    pub fn flush(&self) -> Result<(), StarflowError> {
        let text = serde_json::to_string_pretty(&Value::Object(self.values.clone()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl ParameterStore for JsonFileStore {
    fn load_real(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    fn load_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    fn load_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn save_real(&mut self, key: &str, value: f64) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn save_bool(&mut self, key: &str, value: bool) {
        self.values.insert(key.to_owned(), Value::from(value));
    }

    fn save_string(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), Value::from(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_absent_keys_load_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load_real("sharpenStars"), None);
        assert_eq!(store.load_bool("correct"), None);
        assert_eq!(store.load_string("targetBufferRef"), None);
    }

    #[test]
    fn memory_store_typed_roundtrip() {
        let mut store = MemoryStore::new();
        store.save_real("sharpenStars", 0.65);
        store.save_bool("correct", true);
        store.save_string("targetBufferRef", "M31_final");

        assert_eq!(store.load_real("sharpenStars"), Some(0.65));
        assert_eq!(store.load_bool("correct"), Some(true));
        assert_eq!(store.load_string("targetBufferRef"), Some("M31_final".into()));
    }

    #[test]
    fn load_with_mismatched_type_is_none() {
        let mut store = MemoryStore::new();
        store.save_string("overlap", "large");
        assert_eq!(store.load_real("overlap"), None);
    }

    #[test]
    fn json_file_store_roundtrips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("starflow_settings.json");

        let mut store = JsonFileStore::open(&path).expect("open fresh store");
        store.save_real("adjustHalos", -0.25);
        store.save_bool("generateStarMask", false);
        store.flush().expect("flush");

        let reopened = JsonFileStore::open(&path).expect("reopen store");
        assert_eq!(reopened.load_real("adjustHalos"), Some(-0.25));
        assert_eq!(reopened.load_bool("generateStarMask"), Some(false));
    }

    #[test]
    fn json_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::open(dir.path().join("absent.json")).expect("open");
        assert_eq!(store.load_real("overlap"), None);
    }
}
