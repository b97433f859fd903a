use tabled::Table;

use crate::{cli::build_service, config::Config, error, info, success, types::TrackTableRow};

pub async fn like(config: &Config, user_id: String, library_user_id: String, track_ids: Vec<String>) {
    let service = build_service(config, false);

    match service
        .like_tracks(&user_id, &library_user_id, &track_ids)
        .await
    {
        Ok(()) => success!(
            "Liked {} tracks from the library of {}.",
            track_ids.len(),
            library_user_id
        ),
        Err(e) => error!("Cannot store likes. Err: {}", e),
    }
}

pub async fn likes(config: &Config, user_id: String) {
    let service = build_service(config, false);

    match service.get_liked_tracks(&user_id).await {
        Ok(tracks) if tracks.is_empty() => info!("No liked tracks for {}.", user_id),
        Ok(tracks) => {
            let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Cannot load likes. Err: {}", e),
    }
}
