// Preference storage
//
// A tiny key/value store holding the theme preference across sessions.
// The on-disk form is a flat JSON object of strings in the per-user config
// directory, e.g. `{"theme": "dark"}`.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::StoreError;

/// File name used under the per-user config directory
const PREFERENCES_FILE: &str = "preferences.json";

/// Durable key/value storage for user preferences
pub trait PreferenceStore {
    /// Read the value stored under `key`, `Ok(None)` when unset
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value)
    }
}

/// Resolve the per-user config directory for folio
pub fn config_dir() -> Result<PathBuf, StoreError> {
    let proj_dirs = ProjectDirs::from("dev", "folio", "folio").ok_or(StoreError::NoConfigDir)?;
    Ok(proj_dirs.config_dir().to_path_buf())
}

/// JSON-file backed store
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `preferences.json` in the per-user config directory
    pub fn in_config_dir() -> Result<Self, StoreError> {
        Ok(Self::new(config_dir()?.join(PREFERENCES_FILE)))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking every future write.
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StoreError::Json(e)) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Replacing malformed preference file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(classify_write_error)?;
        }
        let contents = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, contents).map_err(classify_write_error)?;
        Ok(())
    }
}

/// Denied writes mean the store is unusable, not that the disk misbehaved
fn classify_write_error(e: io::Error) -> StoreError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::Io(e)
    }
}

/// In-memory store (tests and `--ephemeral` sessions)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
