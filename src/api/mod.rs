//! # API Module
//!
//! HTTP endpoints of the pumpkin server. Handlers are thin: they decode the
//! request, call into [`crate::service::ShareService`] and map the result.
//!
//! ## Endpoints
//!
//! - `GET /health` - [`health`], status and version
//! - `POST /api/v1/import` - [`import`], imports a library and returns a share id
//! - `GET /api/v1/tracks/{share_id}` - [`tracks`], window of a shared sample
//! - `GET /api/v1/user/{share_id}` - [`user`], owner of a share
//! - `PUT|POST /api/v1/like` - [`like`], records liked tracks of a shared library
//! - `GET /api/v1/likes/{user_id}` - [`likes`], liked tracks of a listener
//! - `POST /api/v1/create-playlist` - [`create_playlist`], from explicit ids or
//!   from the likes
//!
//! ## Errors
//!
//! Every failure is answered with the status from
//! [`crate::error::Error::status_code`] and a JSON body:
//!
//! ```text
//! {"error": {"status": "404", "message": "Not found: share AbC12345"}}
//! ```

mod health;
mod share;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

pub use health::health;
pub use share::{create_playlist, import, like, likes, tracks, user};

use crate::error::Error;

pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let body = json!({
            "error": {
                "status": status.as_u16().to_string(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
