use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    config::{CacheTtl, PagingLimits},
    error::Result,
    management::{
        keys,
        store::{CacheStore, Entry, get_json, get_json_entry, set_json, set_json_if_absent},
    },
    spotify::{SpotifyClient, library::fetch_library},
    types::{Library, User},
};

/// Cache-aside access to users and libraries.
///
/// Reads go to the cache first; a miss is fetched from Spotify and written
/// back with its TTL before it is returned. A cached library is never
/// replaced while it is live.
#[derive(Clone)]
pub struct LibraryManager {
    store: Arc<dyn CacheStore>,
    spotify: SpotifyClient,
    paging: PagingLimits,
    ttl: CacheTtl,
}

impl LibraryManager {
    pub fn new(
        store: Arc<dyn CacheStore>,
        spotify: SpotifyClient,
        paging: PagingLimits,
        ttl: CacheTtl,
    ) -> Self {
        Self {
            store,
            spotify,
            paging,
            ttl,
        }
    }

    /// The user an access token belongs to.
    pub async fn user_for_token(&self, token: &str) -> Result<User> {
        let key = keys::user_by_token(token);
        if let Some(user) = get_json::<User>(self.store.as_ref(), &key).await? {
            debug!(user_id = %user.id, "user served from token cache");
            return Ok(user);
        }

        let user = self.spotify.me(token).await?;
        set_json(self.store.as_ref(), &key, &user, self.ttl.token).await?;
        set_json(
            self.store.as_ref(),
            &keys::user_by_id(&user.id),
            &user,
            self.ttl.user,
        )
        .await?;

        Ok(user)
    }

    /// Id of the user an access token belongs to. Served from the token
    /// cache when possible, otherwise resolved with `GET /me`.
    pub async fn user_id_for_token(&self, token: &str) -> Result<String> {
        Ok(self.user_for_token(token).await?.id)
    }

    /// Cached user by id. Spotify only exposes a public profile by id, so a
    /// miss stays a miss.
    pub async fn cached_user(&self, user_id: &str) -> Result<Option<User>> {
        get_json(self.store.as_ref(), &keys::user_by_id(user_id)).await
    }

    /// The cached library of `user_id`, if one is live and decodes.
    pub async fn cached_library(&self, user_id: &str) -> Result<Option<Library>> {
        get_json(self.store.as_ref(), &keys::library(user_id)).await
    }

    /// The library of `user`, aggregated from Spotify on a cache miss.
    ///
    /// A live cached library is returned as it is and never replaced. An
    /// entry that no longer decodes (for example after a schema change) is
    /// treated as a miss and overwritten by the fresh aggregation.
    ///
    /// # Errors
    ///
    /// Any error of the aggregation. Nothing is cached in that case.
    pub async fn library(&self, user: &User, token: &str) -> Result<Library> {
        let key = keys::library(&user.id);
        let stale = match get_json_entry::<Library>(self.store.as_ref(), &key).await? {
            Entry::Hit(library) => {
                debug!(user_id = %user.id, "library served from cache");
                return Ok(library);
            }
            Entry::Miss => false,
            Entry::Undecodable => true,
        };

        let library = fetch_library(&self.spotify, &self.paging, user.clone(), token).await?;

        if stale {
            set_json(self.store.as_ref(), &key, &library, self.ttl.library).await?;
            info!(user_id = %user.id, "undecodable library replaced");
            return Ok(library);
        }

        if set_json_if_absent(self.store.as_ref(), &key, &library, self.ttl.library).await? {
            info!(user_id = %user.id, "library cached");
            return Ok(library);
        }

        // a concurrent import cached first; keep that copy authoritative
        Ok(self.cached_library(&user.id).await?.unwrap_or(library))
    }
}
