//! Time-bounded cache of road distances over a [`KeyValueStore`].
//!
//! Entries are stored as JSON `{"ts": <ms since epoch>, "m": <meters>}` under
//! `routing:{lat},{lon}|{lat},{lon}`. The key is direction sensitive.

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Coordinate;
use crate::traits::KeyValueStore;

/// In-process store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) {
        self.entries.lock().insert(key.to_string(), value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedRoadDistance {
    #[serde(rename = "m")]
    pub meters: f64,
    #[serde(rename = "ts")]
    pub inserted_at_ms: u64,
}

#[derive(Debug)]
pub struct RoadDistanceCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> RoadDistanceCache<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(from: Coordinate, to: Coordinate) -> String {
        format!("routing:{},{}|{},{}", from.lat, from.lon, to.lat, to.lon)
    }

    /// Stored entry regardless of age. Unreadable entries count as absent.
    pub fn get(&self, from: Coordinate, to: Coordinate) -> Option<CachedRoadDistance> {
        let key = Self::key(from, to);
        let raw = self.store.get(&key)?;
        match serde_json::from_str::<CachedRoadDistance>(&raw) {
            Ok(entry) if entry.meters.is_finite() && entry.meters >= 0.0 => Some(entry),
            Ok(_) | Err(_) => {
                debug!(key = %key, "Ignoring malformed cache entry");
                None
            }
        }
    }

    /// Meters for the pair if an entry younger than the TTL exists.
    pub fn get_fresh(&self, from: Coordinate, to: Coordinate, now_ms: u64) -> Option<f64> {
        let entry = self.get(from, to)?;
        let age = Duration::from_millis(now_ms.saturating_sub(entry.inserted_at_ms));
        if age < self.ttl {
            Some(entry.meters)
        } else {
            debug!(?age, "Cache entry expired");
            None
        }
    }

    pub fn put(&self, from: Coordinate, to: Coordinate, meters: f64, now_ms: u64) {
        let entry = CachedRoadDistance {
            meters,
            inserted_at_ms: now_ms,
        };
        match serde_json::to_string(&entry) {
            Ok(raw) => self.store.set(&Self::key(from, to), raw),
            Err(err) => debug!(error = %err, "Could not encode cache entry"),
        }
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
