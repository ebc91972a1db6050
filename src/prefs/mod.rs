//! Durable key-value preferences for tool locations.
//!
//! The converter needs two paths that survive across sessions: the Java
//! executable used to launch bundletool, and the bundletool jar itself.
//! Both live in a single JSON file at a fixed per-user location.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Preference key for the Java executable used to launch bundletool.
pub const KEY_JAVA_EXECUTABLE: &str = "java_executable_file";

/// Preference key for the bundletool jar archive.
pub const KEY_BUNDLE_TOOL: &str = "bundle_tool_file";

/// Persistent key-value store backed by one JSON file.
///
/// Every [`put`](Self::put) rewrites the full backing file synchronously -
/// durability over throughput. The store assumes a single-user desktop:
/// concurrent writers race and the last write wins.
///
/// The store is an explicit object constructed from a path, so tests can
/// substitute a temp-dir store for the per-user default.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Opens a store backed by the given file, loading existing entries.
    ///
    /// A missing backing file is not an error - the store starts empty and
    /// the file (and its parent directory) is created on the first `put`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Opens the per-user default store.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Returns the fixed per-user backing file location:
    /// `<data_local_dir>/aab2apk/preferences.json`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("no per-user data directory on this platform"))?;
        Ok(base.join("aab2apk").join("preferences.json"))
    }

    /// Returns the stored value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    /// Stores `value` under `key` and persists immediately.
    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
