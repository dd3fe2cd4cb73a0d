//! Key-value persistence for serializable values.
//!
//! `KeyValueStore` is the string-to-string backend (a directory of JSON files
//! on disk, or an in-memory map), and `PersistentStore` layers typed
//! load/save on top of it. Loading never fails: missing, unreadable or
//! malformed data yields the caller's default.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::error::StoreError;

/// A string key-value store scoped to one user profile.
pub trait KeyValueStore {
    /// Fetch the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// File-backed store: each key lives in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Open a store rooted at `dir`. The directory is created on first write.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key_file_stem(key)))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| StoreError::Io { path, source }
        };
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp).map_err(io_err(&tmp))?;
        f.write_all(value.as_bytes()).map_err(io_err(&tmp))?;
        f.flush().map_err(io_err(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        Ok(())
    }
}

/// Map a key to a file stem. ASCII alphanumerics, `-` and `_` are kept; every
/// other byte becomes `%XX`, so distinct keys never share a file. The empty key
/// is `%`, which no other key produces.
pub fn key_file_stem(key: &str) -> String {
    if key.is_empty() {
        return "%".to_string();
    }
    let mut stem = String::with_capacity(key.len());
    for b in key.bytes() {
        if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
            stem.push(b as char);
        } else {
            stem.push_str(&format!("%{b:02X}"));
        }
    }
    stem
}

/// In-memory store, used by tests and when embedding the task store.
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry directly, bypassing serialization.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed load/save of `T` values over a [`KeyValueStore`].
#[derive(Debug)]
pub struct PersistentStore<T, S> {
    backend: S,
    _value: PhantomData<fn() -> T>,
}

impl<T, S> PersistentStore<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    pub fn new(backend: S) -> Self {
        Self {
            backend,
            _value: PhantomData,
        }
    }

    /// Load the value stored under `key`, or `default` when there is none or
    /// it cannot be read or decoded.
    pub fn load(&self, key: &str, default: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key, error = %e, "stored value unreadable, using default");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "stored value malformed, using default");
                default
            }
        }
    }

    /// Serialize `value` and overwrite whatever is stored under `key`.
    pub fn save(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let data = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.backend.set(key, &data)?;
        debug!(key, bytes = data.len(), "persisted");
        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}
