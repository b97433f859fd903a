use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};

use crate::{
    config::SampleLimits,
    types::{Library, Track},
    utils,
};

/// Builds the shareable sample of a library.
///
/// The candidate pool is the first liked tracks, plus the first tracks of a
/// random selection of albums and of playlists. The pool is filtered to
/// tracks with a preview, deduplicated by track id, shuffled and capped.
pub fn sample_library(library: &Library, limits: &SampleLimits) -> Vec<Track> {
    sample_library_with(library, limits, &mut rand::rng())
}

pub fn sample_library_with<R: Rng + ?Sized>(
    library: &Library,
    limits: &SampleLimits,
    rng: &mut R,
) -> Vec<Track> {
    let per_collection = limits.tracks_per_collection;

    let mut pool: Vec<Track> = library
        .liked_tracks
        .iter()
        .take(limits.liked_tracks)
        .cloned()
        .collect();

    for album in library.albums.choose_multiple(rng, limits.albums) {
        pool.extend(album.tracks.iter().take(per_collection).cloned());
    }
    for playlist in library.playlists.choose_multiple(rng, limits.playlists) {
        pool.extend(playlist.tracks.iter().take(per_collection).cloned());
    }

    pool.retain(Track::is_shareable);
    utils::remove_duplicate_tracks(&mut pool);
    pool.shuffle(rng);
    pool.truncate(limits.max_tracks);
    pool
}
