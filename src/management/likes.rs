use std::{sync::Arc, time::Duration};

use tracing::debug;

use crate::{
    error::Result,
    management::{
        keys,
        store::{CacheStore, get_json, set_json},
    },
    types::Like,
};

/// Per-listener list of liked tracks, kept until it is turned into a
/// playlist or expires.
#[derive(Clone)]
pub struct LikeIndex {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl LikeIndex {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Appends likes for `user_id`, skipping ones already recorded. Every
    /// write renews the TTL of the whole list.
    ///
    /// # Returns
    ///
    /// The number of likes stored after the write.
    pub async fn add(
        &self,
        user_id: &str,
        library_user_id: &str,
        track_ids: &[String],
    ) -> Result<usize> {
        let mut likes = self.all(user_id).await?;
        for track_id in track_ids {
            let like = Like {
                library_user_id: library_user_id.to_string(),
                track_id: track_id.clone(),
            };
            if !likes.contains(&like) {
                likes.push(like);
            }
        }

        set_json(self.store.as_ref(), &keys::likes(user_id), &likes, self.ttl).await?;
        debug!(count = likes.len(), "likes stored");
        Ok(likes.len())
    }

    /// Likes of `user_id` in the order they were made. Empty when none exist.
    pub async fn all(&self, user_id: &str) -> Result<Vec<Like>> {
        Ok(get_json(self.store.as_ref(), &keys::likes(user_id))
            .await?
            .unwrap_or_default())
    }

    pub async fn clear(&self, user_id: &str) -> Result<()> {
        self.store.remove(&keys::likes(user_id)).await
    }
}
