use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    cli::{build_service, transport},
    config::Config,
    error,
    error::Error,
    info,
    spotify::auth::refresh_access_token,
    success,
    types::TrackTableRow,
    warning,
};

pub async fn import(config: &Config, token: String, refresh_token: Option<String>) {
    let token = match refresh_token {
        Some(refresh_token) => {
            match refresh_access_token(&*transport(config), config, &refresh_token).await {
                Ok(t) => t.access_token,
                Err(e) => error!("Failed to refresh access token. Err: {}", e),
            }
        }
        None => token,
    };

    let service = build_service(config, false);

    let pb = ProgressBar::new_spinner();
    pb.set_message("Importing Spotify library...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = service.initialize_shared_library(&token).await;
    pb.finish_and_clear();

    match result {
        Ok(share_id) => success!("Library shared. Share id: {}", share_id),
        Err(Error::Authentication) => {
            error!("Spotify rejected the access token. Get a new one or pass --refresh-token.")
        }
        Err(e) => error!("Cannot import library. Err: {}", e),
    }
}

pub async fn tracks(config: &Config, share_id: String, limit: Option<usize>, offset: Option<usize>) {
    let service = build_service(config, false);

    match service.get_tracks_by_share_id(&share_id, limit, offset).await {
        Ok(tracks) if tracks.is_empty() => info!("No tracks in this window."),
        Ok(tracks) => {
            let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Err(Error::NotFound(_)) => warning!("Share {} does not exist or has expired.", share_id),
        Err(e) => error!("Cannot load shared tracks. Err: {}", e),
    }
}

pub async fn user(config: &Config, share_id: String) {
    let service = build_service(config, false);

    match service.get_cached_user_by_share_id(&share_id).await {
        Ok(Some(user)) => info!(
            "{} ({})",
            user.display_name.as_deref().unwrap_or(&user.id),
            user.id
        ),
        Ok(None) => warning!("No cached owner for share {}.", share_id),
        Err(e) => error!("Cannot load share owner. Err: {}", e),
    }
}
