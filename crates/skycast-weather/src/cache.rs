//! Local key-value store with timestamped entries.
//!
//! Entries live in a single JSON file in the config directory, each value
//! stored as its own JSON text so one damaged entry never poisons the rest.
//! The store has no notion of expiry; callers decide freshness with
//! [`CacheEntry::is_fresh`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::types::WeatherError;

const STORE_FILE: &str = "local_storage.json";

/// Cache key for a city's weather lookup
pub fn weather_key(city: &str) -> String {
    format!("weather_{}", city)
}

/// A stored value and when it was written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    #[serde(rename = "value")]
    pub payload: T,
    #[serde(rename = "time", with = "chrono::serde::ts_milliseconds")]
    pub stored_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// True while `now - stored_at < ttl`. An entry stamped in the future
    /// counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.stored_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}

pub struct CacheStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("path", &self.path)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl CacheStore {
    /// Open the store in `config_dir`, starting empty if the file is
    /// missing or unreadable.
    pub fn open(config_dir: &Path) -> Self {
        Self::open_with_clock(config_dir, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config_dir: &Path, clock: Arc<dyn Clock>) -> Self {
        let path = config_dir.join(STORE_FILE);
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Ignoring unreadable cache file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("Failed to read cache file {:?}: {}", path, e);
                BTreeMap::new()
            }
        };

        tracing::debug!("Opened cache store with {} entries", entries.len());

        Self {
            path: Some(path),
            entries,
            clock,
        }
    }

    /// A store that never touches disk
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            path: None,
            entries: BTreeMap::new(),
            clock,
        }
    }

    /// Store `value` stamped with the current time, replacing any prior entry.
    ///
    /// Only a serialization failure is an error. A failed disk write is
    /// logged and the entry still serves reads for this session.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), WeatherError> {
        let entry = CacheEntry {
            payload: value,
            stored_at: self.clock.now(),
        };
        let raw = serde_json::to_string(&entry)
            .map_err(|e| WeatherError::Cache(format!("failed to encode {}: {}", key, e)))?;
        self.entries.insert(key.to_string(), raw);
        self.flush();
        Ok(())
    }

    /// The stored entry, or `None` if it was never saved or cannot be parsed
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = self.entries.get(key)?;
        match serde_json::from_str(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Treating corrupt cache entry {} as missing: {}", key, e);
                None
            }
        }
    }

    /// The stored entry only if it is younger than `ttl`
    pub fn load_fresh<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<CacheEntry<T>> {
        self.load(key).filter(|entry| entry.is_fresh(self.clock.now(), ttl))
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, key: &str, raw: &str) {
        self.entries.insert(key.to_string(), raw.to_string());
    }

    fn flush(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let result = serde_json::to_string_pretty(&self.entries)
            .map_err(std::io::Error::other)
            .and_then(|contents| {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, contents)
            });

        if let Err(e) = result {
            tracing::warn!("Failed to persist cache to {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    const TTL: Duration = Duration::from_secs(10 * 60);

    #[test]
    fn test_load_missing_key() {
        let store = CacheStore::in_memory(Arc::new(ManualClock::new(t0())));
        assert!(store.load::<String>("weather_Paris").is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let clock = Arc::new(ManualClock::new(t0()));
        let mut store = CacheStore::in_memory(clock.clone());

        store.save("k", &"first").unwrap();
        clock.advance(chrono::Duration::seconds(5));
        store.save("k", &"second").unwrap();

        let entry = store.load::<String>("k").unwrap();
        assert_eq!(entry.payload, "second");
        assert_eq!(entry.stored_at, t0() + chrono::Duration::seconds(5));
    }

    #[test]
    fn test_ttl_boundary() {
        let clock = Arc::new(ManualClock::new(t0()));
        let mut store = CacheStore::in_memory(clock.clone());
        store.save(&weather_key("Oslo"), &42u32).unwrap();

        clock.set(t0() + chrono::Duration::minutes(10) - chrono::Duration::milliseconds(1));
        assert_eq!(
            store.load_fresh::<u32>(&weather_key("Oslo"), TTL).map(|e| e.payload),
            Some(42)
        );

        clock.set(t0() + chrono::Duration::minutes(10) + chrono::Duration::milliseconds(1));
        assert!(store.load_fresh::<u32>(&weather_key("Oslo"), TTL).is_none());

        // Expired entries are not evicted
        assert!(store.load::<u32>(&weather_key("Oslo")).is_some());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let mut store = CacheStore::in_memory(Arc::new(ManualClock::new(t0())));
        store.insert_raw("theme", "{not json");
        assert!(store.load::<String>("theme").is_none());
    }

    #[test]
    fn test_wrong_shape_is_a_miss() {
        let mut store = CacheStore::in_memory(Arc::new(ManualClock::new(t0())));
        store.save("k", &"text").unwrap();
        assert!(store.load::<u32>("k").is_none());
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(ManualClock::new(t0()));

        let mut store = CacheStore::open_with_clock(dir.path(), clock.clone());
        store.save("theme", &"dark").unwrap();
        drop(store);

        let reopened = CacheStore::open_with_clock(dir.path(), clock);
        let entry = reopened.load::<String>("theme").unwrap();
        assert_eq!(entry.payload, "dark");
        assert_eq!(entry.stored_at, t0());
    }

    #[test]
    fn test_unreadable_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(STORE_FILE), "garbage").unwrap();

        let store = CacheStore::open_with_clock(dir.path(), Arc::new(ManualClock::new(t0())));
        assert!(store.load::<String>("theme").is_none());
    }

    #[test]
    fn test_entry_wire_shape() {
        let entry = CacheEntry {
            payload: "dark",
            stored_at: t0(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({ "value": "dark", "time": 1_700_000_000_000i64 }));
    }
}
