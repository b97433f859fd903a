use tracing::info;

use crate::{
    error::{Error, Result},
    spotify::client::{SpotifyClient, encoded_path},
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, track_uri,
    },
};

/// Spotify accepts at most this many URIs per add-tracks call.
pub const ADD_TRACKS_CHUNK: usize = 100;

/// Creates a private playlist for `user_id` and appends `track_ids` in order.
///
/// # Errors
///
/// - `Error::BadRequest` if the name is blank or no track ids were given
/// - any executor error from the create or add calls; a failure while adding
///   leaves the already created playlist in place
pub async fn create(
    client: &SpotifyClient,
    user_id: &str,
    name: &str,
    track_ids: &[String],
    token: &str,
) -> Result<CreatePlaylistResponse> {
    if name.trim().is_empty() {
        return Err(Error::BadRequest("playlist name must not be blank".into()));
    }
    if track_ids.is_empty() {
        return Err(Error::BadRequest("no tracks to add to the playlist".into()));
    }

    let request = CreatePlaylistRequest {
        name: name.to_string(),
        description: "Created with pumpkin".to_string(),
        public: false,
        collaborative: false,
    };
    let playlist: CreatePlaylistResponse = client
        .post(&encoded_path(&["users", user_id, "playlists"])?, token, &request)
        .await?;

    for (index, chunk) in track_ids.chunks(ADD_TRACKS_CHUNK).enumerate() {
        add_tracks(client, &playlist.id, chunk, index * ADD_TRACKS_CHUNK, token).await?;
    }

    info!(playlist_id = %playlist.id, tracks = track_ids.len(), "playlist created");
    Ok(playlist)
}

/// Inserts `track_ids` into a playlist at `position` with one
/// `POST /playlists/{id}/tracks` call. Spotify accepts at most
/// [`ADD_TRACKS_CHUNK`] ids per call; [`create`] does the chunking.
pub async fn add_tracks(
    client: &SpotifyClient,
    playlist_id: &str,
    track_ids: &[String],
    position: usize,
    token: &str,
) -> Result<AddTrackToPlaylistResponse> {
    let request = AddTrackToPlaylistRequest {
        uris: track_ids.iter().map(|id| track_uri(id)).collect(),
        position,
    };

    client
        .post(&encoded_path(&["playlists", playlist_id, "tracks"])?, token, &request)
        .await
}
