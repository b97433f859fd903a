use std::{sync::Arc, time::Duration};

use crate::{
    error::{Error, Result},
    management::{
        keys,
        store::{CacheStore, get_json, set_json},
    },
    types::Track,
    utils,
};

pub const DEFAULT_LIMIT: usize = 10;

/// The two cache-backed share mappings: share id to owner, share id to the
/// frozen track sample.
#[derive(Clone)]
pub struct ShareIndex {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ShareIndex {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Stores both mappings under the same TTL. An existing record with the
    /// same id is overwritten.
    pub async fn save(&self, share_id: &str, owner_id: &str, tracks: &[Track]) -> Result<()> {
        set_json(
            self.store.as_ref(),
            &keys::share_tracks(share_id),
            tracks,
            self.ttl,
        )
        .await?;
        set_json(
            self.store.as_ref(),
            &keys::share_owner(share_id),
            owner_id,
            self.ttl,
        )
        .await
    }

    /// Id of the user who created `share_id`, or `None` once it expired.
    pub async fn owner(&self, share_id: &str) -> Result<Option<String>> {
        get_json(self.store.as_ref(), &keys::share_owner(share_id)).await
    }

    /// The whole frozen sample of `share_id`.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` if the share never existed or has expired.
    pub async fn all_tracks(&self, share_id: &str) -> Result<Vec<Track>> {
        get_json(self.store.as_ref(), &keys::share_tracks(share_id))
            .await?
            .ok_or_else(|| Error::NotFound(format!("share {}", share_id)))
    }

    /// A window of the sample. Offset past the end yields an empty list.
    pub async fn tracks(
        &self,
        share_id: &str,
        offset: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Vec<Track>> {
        let tracks = self.all_tracks(share_id).await?;
        Ok(utils::window(
            tracks,
            offset.unwrap_or(0),
            limit.unwrap_or(DEFAULT_LIMIT),
        ))
    }
}
