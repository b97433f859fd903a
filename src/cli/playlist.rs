use crate::{cli::build_service, config::Config, error, info, success};

pub async fn create_playlist(
    config: &Config,
    token: String,
    user_id: String,
    name: String,
    track_ids: Vec<String>,
) {
    let service = build_service(config, false);

    if track_ids.is_empty() {
        info!("Create playlist {} from the liked tracks", name);
    } else {
        info!("Create playlist {} with {} tracks", name, track_ids.len());
    }
    match service
        .create_playlist(&user_id, &name, &track_ids, &token)
        .await
    {
        Ok(playlist) => success!("Playlist {} created ({}).", playlist.name, playlist.id),
        Err(e) => error!("Failed to create playlist. Err: {}", e),
    }
}
