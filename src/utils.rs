use std::collections::HashSet;

use rand::{Rng, distr::Alphanumeric};

use crate::types::Track;

pub const SHARE_ID_LENGTH: usize = 8;

/// Random `[A-Za-z0-9]{8}` share id. Uniqueness is not checked.
pub fn generate_share_id() -> String {
    generate_share_id_with(&mut rand::rng())
}

pub fn generate_share_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(SHARE_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Keeps the first occurrence of every track id.
pub fn remove_duplicate_tracks(tracks: &mut Vec<Track>) {
    let mut seen_ids = HashSet::new();
    tracks.retain(|track| seen_ids.insert(track.id.clone()));
}

pub fn window<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
