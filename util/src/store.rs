//! Persistent key-value parameter store
//!
//! Unlike the TOML parameter files in `params`, which are loaded once at
//! start up, the store holds values that other processes may change while the
//! software is running (for example a tuning UI). Readers are expected to
//! poll.
//!
//! Values are stored as strings. Booleans are stored as `"1"` for true, any
//! other content (or a missing key) reads as false.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs while reading from a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No value is stored for key {0:?}")]
    KeyNotFound(String),

    #[error("{0:?} is not a valid key")]
    InvalidKey(String),

    #[error("Cannot read the value for key {0:?}: {1}")]
    ReadError(String, std::io::Error),
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Read access to a key-value parameter store.
pub trait ParamStore {
    /// Get the string stored under `key`.
    fn get(&self, key: &str) -> Result<String, StoreError>;

    /// Get the boolean stored under `key`, false if not set.
    fn get_bool(&self, key: &str) -> bool {
        match self.get(key) {
            Ok(v) => v.trim() == "1",
            Err(_) => false
        }
    }
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileParamStore {
    root: PathBuf
}

/// An in-memory store, used in simulation and tests.
#[derive(Debug, Clone, Default)]
pub struct MemParamStore {
    values: HashMap<String, String>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl FileParamStore {
    /// Open a store rooted at the given directory.
    ///
    /// The directory is not required to exist, reads will just fail with
    /// `KeyNotFound` until it does.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf()
        }
    }

    /// The directory holding the key files.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ParamStore for FileParamStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        // Keys map directly onto file names so must not escape the root
        if key.is_empty()
            || key.contains(|c| c == '/' || c == '\\')
            || key == "."
            || key == ".."
        {
            return Err(StoreError::InvalidKey(key.to_string()))
        }

        match read_to_string(self.root.join(key)) {
            Ok(s) => Ok(s.trim().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound =>
                Err(StoreError::KeyNotFound(key.to_string())),
            Err(e) => Err(StoreError::ReadError(key.to_string(), e))
        }
    }
}

impl MemParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a string value.
    pub fn put<V: Into<String>>(&mut self, key: &str, value: V) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Store a boolean value.
    pub fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, if value { "1" } else { "0" });
    }

    /// Remove a key, returning the previous value if any.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }
}

impl ParamStore for MemParamStore {
    fn get(&self, key: &str) -> Result<String, StoreError> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Make an empty scratch directory unique to this test.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("steer_util_store_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_mem_store() {
        let mut store = MemParamStore::new();

        assert!(matches!(store.get("TorqueFriction"), Err(StoreError::KeyNotFound(_))));
        assert_eq!(store.get_bool("CustomLateralTune"), false);

        store.put("TorqueFriction", "10");
        store.put_bool("CustomLateralTune", true);
        assert_eq!(store.get("TorqueFriction").unwrap(), "10");
        assert!(store.get_bool("CustomLateralTune"));

        store.put_bool("CustomLateralTune", false);
        assert!(!store.get_bool("CustomLateralTune"));

        assert_eq!(store.remove("TorqueFriction"), Some("10".to_string()));
        assert!(store.get("TorqueFriction").is_err());
    }

    #[test]
    fn test_file_store() {
        let dir = scratch_dir("file");
        let store = FileParamStore::new(&dir);

        std::fs::write(dir.join("TorqueMaxLatAccel"), "25\n").unwrap();
        std::fs::write(dir.join("CustomLateralTune"), "1").unwrap();
        std::fs::write(dir.join("TorqueUseSteeringAngle"), "0").unwrap();

        assert_eq!(store.get("TorqueMaxLatAccel").unwrap(), "25");
        assert!(store.get_bool("CustomLateralTune"));
        assert!(!store.get_bool("TorqueUseSteeringAngle"));
        assert!(!store.get_bool("Missing"));
        assert!(matches!(store.get("Missing"), Err(StoreError::KeyNotFound(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_store_rejects_paths() {
        let store = FileParamStore::new(scratch_dir("paths"));

        assert!(matches!(store.get("../etc/passwd"), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get(""), Err(StoreError::InvalidKey(_))));
        assert!(matches!(store.get(".."), Err(StoreError::InvalidKey(_))));
    }
}
