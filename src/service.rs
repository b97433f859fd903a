//! Core-facing contract for the HTTP layer and the CLI.
//!
//! [`ShareService`] ties the pieces together:
//!
//! ```text
//! access token → user (cache or /me) → library (cache or aggregation)
//!              → sample → share index (owner + tracks)
//! ```
//!
//! Read paths go from a share id to a window of the frozen sample, or to the
//! cached owner.

use std::{collections::HashMap, sync::Arc};

use tracing::info;

use crate::{
    config::{Config, SampleLimits},
    error::{Error, Result},
    management::{CacheStore, LibraryManager, LikeIndex, ShareIndex},
    sampler,
    spotify::{self, HttpTransport, SpotifyClient},
    types::{CreatePlaylistResponse, Library, Track, User},
    utils,
};

#[derive(Clone)]
pub struct ShareService {
    spotify: SpotifyClient,
    libraries: LibraryManager,
    shares: ShareIndex,
    likes: LikeIndex,
    sample: SampleLimits,
}

impl ShareService {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>, store: Arc<dyn CacheStore>) -> Self {
        let spotify = SpotifyClient::new(transport, config);
        let libraries = LibraryManager::new(
            Arc::clone(&store),
            spotify.clone(),
            config.paging.clone(),
            config.ttl.clone(),
        );
        let shares = ShareIndex::new(Arc::clone(&store), config.ttl.share);
        let likes = LikeIndex::new(store, config.ttl.likes);

        Self {
            spotify,
            libraries,
            shares,
            likes,
            sample: config.sample.clone(),
        }
    }

    pub fn libraries(&self) -> &LibraryManager {
        &self.libraries
    }

    /// Imports the token owner's library (or reuses the cached one), samples
    /// it and stores a new share record. Returns the share id.
    pub async fn initialize_shared_library(&self, access_token: &str) -> Result<String> {
        if utils::is_blank(access_token) {
            return Err(Error::BadRequest("invalid Spotify access token".into()));
        }

        let user = self.libraries.user_for_token(access_token).await?;
        let library = self.libraries.library(&user, access_token).await?;
        let tracks = sampler::sample_library(&library, &self.sample);

        let share_id = utils::generate_share_id();
        self.shares.save(&share_id, &user.id, &tracks).await?;

        info!(user_id = %user.id, tracks = tracks.len(), "share created");
        Ok(share_id)
    }

    /// A window of the shared sample; `limit` defaults to 10, `offset` to 0.
    pub async fn get_tracks_by_share_id(
        &self,
        share_id: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Track>> {
        self.shares.tracks(share_id, offset, limit).await
    }

    pub async fn get_cached_user_by_share_id(&self, share_id: &str) -> Result<Option<User>> {
        match self.shares.owner(share_id).await? {
            Some(user_id) => self.libraries.cached_user(&user_id).await,
            None => Ok(None),
        }
    }

    /// Records that `user_id` liked `track_ids` from the library of
    /// `library_user_id`.
    pub async fn like_tracks(
        &self,
        user_id: &str,
        library_user_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        if utils::is_blank(user_id) || utils::is_blank(library_user_id) {
            return Err(Error::BadRequest("user ids must not be blank".into()));
        }
        if track_ids.is_empty() {
            return Err(Error::BadRequest("no tracks to like".into()));
        }

        self.likes.add(user_id, library_user_id, track_ids).await?;
        Ok(())
    }

    /// Tracks `user_id` liked, resolved against the cached libraries they
    /// were picked from. Likes whose library or track is no longer cached are
    /// left out.
    pub async fn get_liked_tracks(&self, user_id: &str) -> Result<Vec<Track>> {
        let mut libraries: HashMap<String, Option<Library>> = HashMap::new();
        let mut tracks = Vec::new();

        for like in self.likes.all(user_id).await? {
            if !libraries.contains_key(&like.library_user_id) {
                let library = self.libraries.cached_library(&like.library_user_id).await?;
                libraries.insert(like.library_user_id.clone(), library);
            }

            if let Some(track) = libraries
                .get(&like.library_user_id)
                .and_then(Option::as_ref)
                .and_then(|library| library.find_track(&like.track_id))
            {
                tracks.push(track.clone());
            }
        }

        utils::remove_duplicate_tracks(&mut tracks);
        Ok(tracks)
    }

    /// Creates a private playlist for `user_id`.
    ///
    /// With no `track_ids`, the playlist is built from the user's likes and
    /// the likes are cleared once the playlist exists.
    ///
    /// # Errors
    ///
    /// - `Error::BadRequest` on a blank token or name, or when there is
    ///   nothing to add
    /// - any executor error from the playlist calls
    pub async fn create_playlist(
        &self,
        user_id: &str,
        playlist_name: &str,
        track_ids: &[String],
        access_token: &str,
    ) -> Result<CreatePlaylistResponse> {
        if utils::is_blank(access_token) {
            return Err(Error::BadRequest("invalid Spotify access token".into()));
        }

        if !track_ids.is_empty() {
            return spotify::playlist::create(
                &self.spotify,
                user_id,
                playlist_name,
                track_ids,
                access_token,
            )
            .await;
        }

        let liked: Vec<String> = self
            .get_liked_tracks(user_id)
            .await?
            .into_iter()
            .map(|track| track.id)
            .collect();
        let playlist =
            spotify::playlist::create(&self.spotify, user_id, playlist_name, &liked, access_token)
                .await?;

        self.likes.clear(user_id).await?;
        info!(playlist_id = %playlist.id, tracks = liked.len(), "likes exported");
        Ok(playlist)
    }
}
