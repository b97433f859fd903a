use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Subscription tier, `"premium"` for paying users.
    #[serde(default)]
    pub product: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub preview_url: Option<String>,
    pub album_name: String,
    pub artists: Vec<String>,
    pub cover_url: Option<String>,
}

impl Track {
    pub fn uri(&self) -> String {
        track_uri(&self.id)
    }

    pub fn is_shareable(&self) -> bool {
        self.preview_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

pub fn track_uri(id: &str) -> String {
    format!("spotify:track:{}", id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub user: User,
    pub liked_tracks: Vec<Track>,
    pub playlists: Vec<Playlist>,
    pub albums: Vec<Album>,
}

impl Library {
    /// Looks a track up across liked tracks, playlists and albums.
    pub fn find_track(&self, track_id: &str) -> Option<&Track> {
        self.liked_tracks
            .iter()
            .chain(self.playlists.iter().flat_map(|p| p.tracks.iter()))
            .chain(self.albums.iter().flat_map(|a| a.tracks.iter()))
            .find(|track| track.id == track_id)
    }
}

/// A track a listener liked in somebody else's shared library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    /// Owner of the library the track was picked from.
    pub library_user_id: String,
    pub track_id: String,
}

// Remote shapes.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Track as returned by `/me/tracks` and playlist track pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    pub album: AlbumRef,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Track embedded in an album; it carries no album of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedTrack {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone)]
pub enum TrackShape<'a> {
    Embedded(FullTrack),
    Attached {
        track: SimplifiedTrack,
        album: &'a AlbumRef,
    },
}

impl TrackShape<'_> {
    /// Flattens either shape into a [`Track`]. Local files have no id and
    /// yield `None`.
    pub fn resolve(self) -> Option<Track> {
        let (id, name, preview_url, artists, album) = match self {
            TrackShape::Embedded(t) => (t.id, t.name, t.preview_url, t.artists, t.album),
            TrackShape::Attached { track: t, album } => {
                (t.id, t.name, t.preview_url, t.artists, album.clone())
            }
        };

        Some(Track {
            id: id?,
            name,
            preview_url,
            album_name: album.name,
            artists: artists.into_iter().map(|a| a.name).collect(),
            cover_url: album.images.into_iter().next().map(|i| i.url),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrackItem {
    pub track: FullTrack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTrackItem {
    #[serde(default)]
    pub track: Option<FullTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksRef {
    pub href: String,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub tracks: TracksRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
    pub tracks: Page<SimplifiedTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedAlbumItem {
    pub album: SavedAlbum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
    pub position: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

// HTTP surface bodies.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub spotify_access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub share_id: String,
}

/// `trackIds` may be omitted; the playlist is then built from the user's likes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistApiRequest {
    pub spotify_access_token: String,
    pub user_id: String,
    pub playlist_name: String,
    #[serde(default)]
    pub track_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeTracksRequest {
    pub user_id: String,
    pub library_user_id: String,
    pub track_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistApiResponse {
    pub playlist: CreatePlaylistResponse,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
}

impl From<&Track> for TrackTableRow {
    fn from(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            artists: track.artists.join(", "),
            album: track.album_name.clone(),
        }
    }
}
