//! Key-value storage backends for the result cache
//!
//! `KeyValueStore` is the small get/set contract the result cache is built on,
//! modelled after browser local storage: string keys, string values, no expiry.
//! `FileStore` persists entries as JSON files in an XDG-compliant cache directory
//! so results survive between runs; `MemoryStore` keeps them for the lifetime of
//! the process only.

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors raised by a storage backend or while encoding a cache entry
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the underlying storage failed
    #[error("Cache storage failed: {0}")]
    Io(#[from] std::io::Error),

    /// The entry could not be converted to JSON
    #[error("Failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A string-to-string store that persists outside the search flow
///
/// Each operation is atomic for a single key.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is unknown or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value, replacing whatever was stored under the key
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }
}

/// Stores each entry as a JSON file in a cache directory
///
/// The default location is `~/.cache/flightsearch/` on Linux, or the
/// equivalent XDG path on other platforms.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the platform cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "flightsearch")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path of the file backing a key
    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", escape_file_stem(key)))
    }

    /// Staging file for a write, unique to this process
    fn temp_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json.{}.tmp", escape_file_stem(key), std::process::id()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        // Write to a sibling file first so a reader never sees a half-written entry
        let path = self.entry_path(key);
        let tmp = self.temp_path(key);
        let written = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Keeps entries in memory for the lifetime of the store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Maps a key to a file stem that stays inside the cache directory
///
/// ASCII letters, digits, `-` and `_` pass through; every other byte becomes
/// `%XX`. Because `%` itself is escaped, distinct keys give distinct stems.
fn escape_file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(byte as char);
        } else {
            let _ = write!(stem, "%{:02X}", byte);
        }
    }
    stem
}
