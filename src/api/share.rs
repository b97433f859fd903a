use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    api::ApiError,
    error::Error,
    service::ShareService,
    types::{
        CreatePlaylistApiRequest, CreatePlaylistApiResponse, ImportRequest, ImportResponse,
        LikeTracksRequest, Track, User,
    },
};

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn import(
    Extension(service): Extension<Arc<ShareService>>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    let share_id = service
        .initialize_shared_library(&request.spotify_access_token)
        .await?;
    Ok(Json(ImportResponse { share_id }))
}

pub async fn tracks(
    Extension(service): Extension<Arc<ShareService>>,
    Path(share_id): Path<String>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<Track>>, ApiError> {
    let tracks = service
        .get_tracks_by_share_id(&share_id, params.limit, params.offset)
        .await?;
    Ok(Json(tracks))
}

pub async fn user(
    Extension(service): Extension<Arc<ShareService>>,
    Path(share_id): Path<String>,
) -> Result<Json<User>, ApiError> {
    service
        .get_cached_user_by_share_id(&share_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("owner of share {}", share_id))))
}

pub async fn create_playlist(
    Extension(service): Extension<Arc<ShareService>>,
    Json(request): Json<CreatePlaylistApiRequest>,
) -> Result<Json<CreatePlaylistApiResponse>, ApiError> {
    let playlist = service
        .create_playlist(
            &request.user_id,
            &request.playlist_name,
            &request.track_ids,
            &request.spotify_access_token,
        )
        .await?;
    Ok(Json(CreatePlaylistApiResponse { playlist }))
}

pub async fn like(
    Extension(service): Extension<Arc<ShareService>>,
    Json(request): Json<LikeTracksRequest>,
) -> Result<StatusCode, ApiError> {
    service
        .like_tracks(
            &request.user_id,
            &request.library_user_id,
            &request.track_ids,
        )
        .await?;
    Ok(StatusCode::OK)
}

pub async fn likes(
    Extension(service): Extension<Arc<ShareService>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Track>>, ApiError> {
    Ok(Json(service.get_liked_tracks(&user_id).await?))
}
