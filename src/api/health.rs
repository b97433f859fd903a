use axum::response::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub name: &'static str,
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe. Does not touch Spotify or the cache store.
pub async fn health() -> Json<Health> {
    Json(Health {
        name: env!("CARGO_PKG_NAME"),
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
