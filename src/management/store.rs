use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::time::Instant;
use tracing::warn;

use crate::error::{Error, Result};

/// Flat key-value store with per-key expiration.
///
/// Every write carries a TTL; there is no way to persist a key forever.
/// Each operation is atomic for its key, so callers need no lock of their own.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Writes only when no live entry exists. Returns whether it wrote.
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// Drops `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

pub(crate) fn check_ttl(key: &str, ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(Error::Cache(format!("refusing to write {} without a TTL", key)));
    }
    Ok(())
}

/// Outcome of a typed cache read.
#[derive(Debug)]
pub enum Entry<T> {
    Hit(T),
    Miss,
    /// A live entry exists but does not decode into `T`.
    Undecodable,
}

/// Reads and decodes a cached value, telling a missing entry apart from one
/// that no longer decodes.
pub async fn get_json_entry<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Result<Entry<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(Entry::Miss);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Entry::Hit(value)),
        Err(e) => {
            // keys may embed an access token; only the namespace is logged
            let namespace = key.rsplit_once(':').map_or(key, |(ns, _)| ns);
            warn!(namespace, error = %e, "ignoring undecodable cache entry");
            Ok(Entry::Undecodable)
        }
    }
}

/// Reads and decodes a cached value. An entry that no longer decodes is
/// reported as a miss.
pub async fn get_json<T: DeserializeOwned>(store: &dyn CacheStore, key: &str) -> Result<Option<T>> {
    match get_json_entry(store, key).await? {
        Entry::Hit(value) => Ok(Some(value)),
        Entry::Miss | Entry::Undecodable => Ok(None),
    }
}

pub async fn set_json<T: Serialize + ?Sized>(
    store: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw, ttl).await
}

pub async fn set_json_if_absent<T: Serialize + ?Sized>(
    store: &dyn CacheStore,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<bool> {
    let raw = serde_json::to_string(value)?;
    store.set_if_absent(key, &raw, ttl).await
}

#[derive(Debug)]
struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-process store. The map lock is held only for the duration of a single
/// operation and never across an await.
#[derive(Debug, Clone, Default)]
pub struct MemoryCacheStore {
    entries: Arc<Mutex<HashMap<String, MemoryEntry>>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, MemoryEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Remaining lifetime of a live key.
    pub fn expires_in(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries()
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.expires_at - now)
    }

    /// Live keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, e)| e.is_live(now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries();
        let live = entries
            .get(key)
            .filter(|e| e.is_live(now))
            .map(|e| e.value.clone());
        if live.is_none() {
            entries.remove(key);
        }
        Ok(live)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        check_ttl(key, ttl)?;
        self.entries().insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        check_ttl(key, ttl)?;
        let now = Instant::now();
        let mut entries = self.entries();
        if entries.get(key).is_some_and(|e| e.is_live(now)) {
            return Ok(false);
        }

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(true)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
