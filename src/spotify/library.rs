use tokio::task::JoinSet;
use tracing::info;

use crate::{
    config::PagingLimits,
    error::{Error, Result},
    spotify::{
        client::SpotifyClient,
        paging::{Pagination, fetch_all},
    },
    types::{
        Album, AlbumRef, Library, Playlist, PlaylistSummary, PlaylistTrackItem, SavedAlbumItem,
        SavedTrackItem, Track, TrackShape, User,
    },
};

/// Fetches the whole library of `user` from the remote service.
///
/// Liked tracks, playlists and albums are fetched concurrently. Each playlist's
/// tracks are fetched in their own task and all of them are joined before the
/// playlists are complete. Any failing sub-fetch fails the whole call.
/// Tracks without a preview URL are dropped.
pub async fn fetch_library(
    client: &SpotifyClient,
    limits: &PagingLimits,
    user: User,
    token: &str,
) -> Result<Library> {
    let (liked_tracks, playlists, albums) = tokio::try_join!(
        fetch_liked_tracks(client, limits, token),
        fetch_playlists(client, limits, token),
        fetch_albums(client, limits, token),
    )?;

    info!(
        user_id = %user.id,
        liked_tracks = liked_tracks.len(),
        playlists = playlists.len(),
        albums = albums.len(),
        "library fetched"
    );

    Ok(Library {
        user,
        liked_tracks,
        playlists,
        albums,
    })
}

/// Fetches the user's saved tracks (`GET /me/tracks`), newest first, up to
/// the configured ceiling. Tracks without a preview are dropped.
pub async fn fetch_liked_tracks(
    client: &SpotifyClient,
    limits: &PagingLimits,
    token: &str,
) -> Result<Vec<Track>> {
    let items: Vec<SavedTrackItem> = fetch_all(
        client,
        token,
        Pagination::new("/me/tracks", limits.tracks_page, limits.tracks_ceiling),
    )
    .await?;

    Ok(shareable(
        items
            .into_iter()
            .filter_map(|item| TrackShape::Embedded(item.track).resolve()),
    ))
}

/// Fetches the user's playlists together with their tracks.
///
/// The playlist summaries come from `GET /me/playlists`. Every playlist's
/// track list is then walked in its own task, following the `tracks.href`
/// handle of the summary.
///
/// # Returns
///
/// Playlists in the order `/me/playlists` listed them.
///
/// # Errors
///
/// The first failing track walk fails the whole call. The remaining tasks
/// are aborted, also when this future is dropped before it completes.
pub async fn fetch_playlists(
    client: &SpotifyClient,
    limits: &PagingLimits,
    token: &str,
) -> Result<Vec<Playlist>> {
    let summaries: Vec<PlaylistSummary> = fetch_all(
        client,
        token,
        Pagination::new(
            "/me/playlists",
            limits.playlists_page,
            limits.playlists_ceiling,
        ),
    )
    .await?;

    let mut tasks = JoinSet::new();
    for (index, summary) in summaries.into_iter().enumerate() {
        let client = client.clone();
        let token = token.to_string();
        let page_size = limits.playlist_tracks_page;
        let ceiling = limits.playlist_tracks_ceiling;

        tasks.spawn(async move {
            let items: Vec<PlaylistTrackItem> = fetch_all(
                &client,
                &token,
                Pagination::new(&summary.tracks.href, page_size, ceiling),
            )
            .await?;

            let playlist = Playlist {
                id: summary.id,
                name: summary.name,
                tracks: shareable(
                    items
                        .into_iter()
                        .filter_map(|item| item.track)
                        .filter_map(|track| TrackShape::Embedded(track).resolve()),
                ),
            };
            Ok::<_, Error>((index, playlist))
        });
    }

    let mut playlists = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        // returning early drops the set, which aborts what is still running
        playlists.push(joined??);
    }

    playlists.sort_by_key(|(index, _)| *index);
    Ok(playlists.into_iter().map(|(_, playlist)| playlist).collect())
}

/// Fetches the user's saved albums (`GET /me/albums`). Album tracks come
/// embedded in the album page and are attached to their album here.
pub async fn fetch_albums(
    client: &SpotifyClient,
    limits: &PagingLimits,
    token: &str,
) -> Result<Vec<Album>> {
    let items: Vec<SavedAlbumItem> = fetch_all(
        client,
        token,
        Pagination::new("/me/albums", limits.albums_page, limits.albums_ceiling),
    )
    .await?;

    Ok(items
        .into_iter()
        .map(|item| {
            let saved = item.album;
            let album = AlbumRef {
                name: saved.name.clone(),
                images: saved.images,
            };
            let tracks = shareable(saved.tracks.items.into_iter().filter_map(|track| {
                TrackShape::Attached {
                    track,
                    album: &album,
                }
                .resolve()
            }));

            Album {
                id: saved.id,
                name: saved.name,
                tracks,
            }
        })
        .collect())
}

fn shareable(tracks: impl Iterator<Item = Track>) -> Vec<Track> {
    tracks.filter(Track::is_shareable).collect()
}
