//! Local cache tier.
//!
//! A durable per-project JSON file in server/CLI contexts, or a pure
//! in-memory map when persistence is disabled. Reads load the full map and
//! writes replace it wholesale; concurrent writers are last-writer-wins,
//! acceptable for regenerable mock data. I/O failures are logged and
//! treated as a miss, never propagated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::entry::CacheEntry;

type CacheMap = BTreeMap<String, CacheEntry>;

/// File-backed store: a pretty-printed JSON object mapping cache key to
/// entry, at `.symulate-cache.json` or a configured override.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> CacheMap {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "Unreadable cache file, starting empty");
                    CacheMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CacheMap::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read cache file");
                CacheMap::new()
            }
        }
    }

    fn save(&self, map: &CacheMap) -> bool {
        let serialized = match serde_json::to_string_pretty(map) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize cache map");
                return false;
            }
        };
        match std::fs::write(&self.path, serialized) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to write cache file");
                false
            }
        }
    }
}

/// In-memory store, the last-resort local tier.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: Mutex<CacheMap>,
}

/// Local cache tier: file-backed or in-memory.
#[derive(Debug)]
pub enum LocalStore {
    File(FileStore),
    Memory(MemoryStore),
}

impl LocalStore {
    /// File-backed store at the given path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileStore::new(path))
    }

    /// Pure in-memory store.
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    /// Look up one entry.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let found = match self {
            Self::File(store) => store.load().get(key).cloned(),
            Self::Memory(store) => store
                .map
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .get(key)
                .cloned(),
        };
        match &found {
            Some(_) => debug!(cache_key = key, tier = "local", "Cache HIT"),
            None => debug!(cache_key = key, tier = "local", "Cache MISS"),
        }
        found
    }

    /// Insert or replace one entry.
    pub fn put(&self, key: &str, entry: CacheEntry) {
        match self {
            Self::File(store) => {
                let mut map = store.load();
                map.insert(key.to_string(), entry);
                store.save(&map);
            }
            Self::Memory(store) => {
                store
                    .map
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .insert(key.to_string(), entry);
            }
        }
    }

    /// Remove one entry; true when it existed.
    pub fn remove(&self, key: &str) -> bool {
        match self {
            Self::File(store) => {
                let mut map = store.load();
                let removed = map.remove(key).is_some();
                if removed {
                    store.save(&map);
                }
                removed
            }
            Self::Memory(store) => store
                .map
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(key)
                .is_some(),
        }
    }

    /// Remove every entry whose key contains `pattern`; returns how many.
    pub fn remove_pattern(&self, pattern: &str) -> usize {
        match self {
            Self::File(store) => {
                let mut map = store.load();
                let before = map.len();
                map.retain(|key, _| !key.contains(pattern));
                let removed = before - map.len();
                if removed > 0 {
                    store.save(&map);
                }
                removed
            }
            Self::Memory(store) => {
                let mut map = store.map.lock().unwrap_or_else(|e| e.into_inner());
                let before = map.len();
                map.retain(|key, _| !key.contains(pattern));
                before - map.len()
            }
        }
    }

    /// Remove everything; returns how many entries were present.
    pub fn clear_all(&self) -> usize {
        match self {
            Self::File(store) => {
                let count = store.load().len();
                if count > 0 {
                    store.save(&CacheMap::new());
                }
                count
            }
            Self::Memory(store) => {
                let mut map = store.map.lock().unwrap_or_else(|e| e.into_inner());
                let count = map.len();
                map.clear();
                count
            }
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        match self {
            Self::File(store) => store.load().len(),
            Self::Memory(store) => store.map.lock().unwrap_or_else(|e| e.into_inner()).len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(key: &str) -> CacheEntry {
        CacheEntry::new(json!({"key": key}), key)
    }

    #[test]
    fn memory_store_round_trip() {
        let store = LocalStore::memory();
        assert!(store.get("k1").is_none());

        store.put("k1", entry("k1"));
        let found = store.get("k1").expect("hit");
        assert_eq!(found.template, json!({"key": "k1"}));

        assert!(store.remove("k1"));
        assert!(!store.remove("k1"));
        assert!(store.get("k1").is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".symulate-cache.json");
        let store = LocalStore::file(&path);

        store.put("k1", entry("k1"));
        store.put("k2", entry("k2"));

        // A fresh store over the same file sees persisted entries.
        let reopened = LocalStore::file(&path);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get("k2").expect("hit").schema_hash, "k2");
    }

    #[test]
    fn file_store_is_pretty_printed_json_object() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        let store = LocalStore::file(&path);
        store.put("k1", entry("k1"));

        let contents = std::fs::read_to_string(&path).expect("file written");
        assert!(contents.contains('\n'), "expected pretty-printed output");
        let parsed: serde_json::Value = serde_json::from_str(&contents).expect("valid JSON");
        assert!(parsed.is_object());
        assert!(parsed["k1"]["schemaHash"].is_string());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::file(dir.path().join("does-not-exist.json"));
        assert!(store.get("k1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_reads_as_empty_and_recovers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json at all").expect("write");

        let store = LocalStore::file(&path);
        assert!(store.get("k1").is_none());

        // Writing after corruption replaces the file with a valid map.
        store.put("k1", entry("k1"));
        assert!(store.get("k1").is_some());
    }

    #[test]
    fn pattern_removal_counts_matches() {
        let store = LocalStore::memory();
        store.put("users-abc", entry("users-abc"));
        store.put("users-def", entry("users-def"));
        store.put("orders-xyz", entry("orders-xyz"));

        assert_eq!(store.remove_pattern("users"), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.remove_pattern("nothing"), 0);
    }

    #[test]
    fn clear_all_reports_count() {
        let store = LocalStore::memory();
        store.put("a", entry("a"));
        store.put("b", entry("b"));
        assert_eq!(store.clear_all(), 2);
        assert_eq!(store.clear_all(), 0);
    }

    #[test]
    fn last_writer_wins_on_same_key() {
        let store = LocalStore::memory();
        store.put("k", entry("first"));
        store.put("k", entry("second"));
        assert_eq!(store.get("k").expect("hit").schema_hash, "second");
    }
}
