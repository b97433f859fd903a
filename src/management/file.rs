use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, Result},
    management::store::{CacheStore, check_ttl},
};

#[derive(Debug, Serialize, Deserialize)]
struct FileEntry {
    value: String,
    /// Unix seconds.
    expires_at: u64,
}

/// Store keeping one JSON file per key, so that cached libraries and share
/// records survive between CLI invocations.
///
/// Writes go to a temporary file first. `set` renames it into place;
/// `set_if_absent` hard-links it, which fails when the key already exists.
/// Expired files are never unlinked by path: readers leave them alone, and
/// `set_if_absent` moves one aside to a tombstone before claiming the key.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

/// Attempts of `set_if_absent` before it gives up on a contended key.
const CLAIM_ATTEMPTS: usize = 8;

impl FileCacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", URL_SAFE_NO_PAD.encode(key.as_bytes())))
    }

    fn scratch_path(&self, key: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!(
            "{}.{:016x}.{}",
            URL_SAFE_NO_PAD.encode(key.as_bytes()),
            rand::random::<u64>(),
            suffix
        ))
    }

    async fn write_temp(&self, key: &str, value: &str, ttl: Duration) -> Result<PathBuf> {
        async_fs::create_dir_all(&self.dir).await?;

        let entry = FileEntry {
            value: value.to_string(),
            expires_at: now_secs().saturating_add(ttl.as_secs().max(1)),
        };
        let tmp = self.scratch_path(key, "tmp");
        if let Err(e) = async_fs::write(&tmp, serde_json::to_vec(&entry)?).await {
            remove_quietly(tmp).await;
            return Err(e.into());
        }
        Ok(tmp)
    }

    /// The live entry of `key`. Expired or unreadable files read as `None`
    /// and stay where they are.
    async fn read_entry(&self, key: &str) -> Result<Option<FileEntry>> {
        Ok(read_file(&self.path(key))
            .await?
            .filter(|entry| entry.expires_at > now_secs()))
    }

    /// Moves a dead file at `key` out of the way.
    ///
    /// The file is renamed to a tombstone first and inspected there. If it
    /// turns out to be live (another writer replaced it in between), it is
    /// linked back and `false` is returned.
    async fn evict_dead(&self, key: &str) -> Result<bool> {
        let path = self.path(key);
        let tombstone = self.scratch_path(key, "dead");

        match async_fs::rename(&path, &tombstone).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
            Err(e) => return Err(e.into()),
        }

        let stolen_live = read_file(&tombstone)
            .await?
            .is_some_and(|entry| entry.expires_at > now_secs());
        if stolen_live {
            let restored = async_fs::hard_link(&tombstone, &path).await;
            remove_quietly(tombstone).await;
            return match restored {
                Ok(()) => Ok(false),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
                Err(e) => Err(e.into()),
            };
        }

        remove_quietly(tombstone).await;
        Ok(true)
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entry(key).await?.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        check_ttl(key, ttl)?;
        let tmp = self.write_temp(key, value, ttl).await?;
        if let Err(e) = async_fs::rename(&tmp, self.path(key)).await {
            remove_quietly(tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        check_ttl(key, ttl)?;
        let tmp = self.write_temp(key, value, ttl).await?;
        let claimed = self.claim(key, &tmp).await;
        remove_quietly(tmp).await;
        claimed
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match async_fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl FileCacheStore {
    async fn claim(&self, key: &str, tmp: &Path) -> Result<bool> {
        let path = self.path(key);
        for _ in 0..CLAIM_ATTEMPTS {
            match async_fs::hard_link(tmp, &path).await {
                Ok(()) => return Ok(true),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            }

            if self.read_entry(key).await?.is_some() {
                return Ok(false);
            }
            if !self.evict_dead(key).await? {
                return Ok(false);
            }
        }

        Err(Error::Cache("cannot claim contended cache key".to_string()))
    }
}

async fn read_file(path: &Path) -> Result<Option<FileEntry>> {
    let content = match async_fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    match serde_json::from_slice::<FileEntry>(&content) {
        Ok(entry) => Ok(Some(entry)),
        Err(_) => {
            debug!(path = %path.display(), "unreadable cache file");
            Ok(None)
        }
    }
}

async fn remove_quietly(path: PathBuf) {
    if let Err(e) = async_fs::remove_file(&path).await {
        debug!(path = %path.display(), error = %e, "cannot remove cache file");
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
