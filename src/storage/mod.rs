// SPDX-License-Identifier: PMPL-1.0-or-later

//! Durable key-value storage for user preferences
//!
//! The guide remembers a single preference (the chosen language) between
//! sessions. Stores are plain string maps so new preferences need no schema
//! change.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key under which the chosen language code is stored.
pub const LANGUAGE_KEY: &str = "language";

/// Default location of the preference file, relative to the working directory.
pub const DEFAULT_PREFERENCES_PATH: &str = ".mapguide/preferences.json";

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Preferences kept as a flat JSON object on disk.
///
/// The file is created on first write. A missing, unreadable or malformed
/// file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        if !self.path.exists() {
            return BTreeMap::new();
        }

        let parsed = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))
            .and_then(|content| {
                serde_json::from_str::<BTreeMap<String, String>>(&content)
                    .with_context(|| format!("parsing {}", self.path.display()))
            });

        match parsed {
            Ok(values) => values,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unusable preference file");
                BTreeMap::new()
            }
        }
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new(DEFAULT_PREFERENCES_PATH)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), key, value, "stored preference");
        Ok(())
    }
}

/// In-memory store for tests and dry runs. Counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_and_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/prefs.json");
        let mut store = FileStore::new(&path);

        assert_eq!(store.get(LANGUAGE_KEY), None);
        store.set(LANGUAGE_KEY, "en").unwrap();
        assert!(path.is_file());

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(LANGUAGE_KEY), Some("en".to_string()));
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("prefs.json"));
        store.set("theme", "dark").unwrap();
        store.set(LANGUAGE_KEY, "pt").unwrap();
        assert_eq!(store.get("theme"), Some("dark".to_string()));
        assert_eq!(store.get(LANGUAGE_KEY), Some("pt".to_string()));
    }

    #[test]
    fn malformed_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        let mut store = FileStore::new(&path);
        assert_eq!(store.get(LANGUAGE_KEY), None);

        store.set(LANGUAGE_KEY, "es").unwrap();
        assert_eq!(store.get(LANGUAGE_KEY), Some("es".to_string()));
    }

    #[test]
    fn memory_store_counts_writes() {
        let mut store = MemoryStore::with(LANGUAGE_KEY, "en");
        assert_eq!(store.get(LANGUAGE_KEY), Some("en".to_string()));
        store.set(LANGUAGE_KEY, "es").unwrap();
        assert_eq!(store.writes(), 1);
    }
}
