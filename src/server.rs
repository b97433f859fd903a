use std::{net::SocketAddr, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post, put},
};
use tracing::info;

use crate::{api, error::Result, service::ShareService};

pub fn router(service: Arc<ShareService>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/api/v1/import", post(api::import))
        .route("/api/v1/tracks/{share_id}", get(api::tracks))
        .route("/api/v1/user/{share_id}", get(api::user))
        .route("/api/v1/like", put(api::like).post(api::like))
        .route("/api/v1/likes/{user_id}", get(api::likes))
        .route("/api/v1/create-playlist", post(api::create_playlist))
        .layer(Extension(service))
}

pub async fn start_api_server(service: Arc<ShareService>, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, router(service)).await?;
    Ok(())
}
