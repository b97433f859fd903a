//! # Spotify Integration Module
//!
//! This module is the remote side of pumpkin: everything that talks to the
//! Spotify Web API lives here. Nothing in this module touches the cache; the
//! cache-aside policy sits one layer up in [`crate::management`].
//!
//! ## Architecture
//!
//! ```text
//! Service Layer (share import, share reads)
//!          ↓
//! Management Layer (cache-aside, share index)
//!          ↓
//! Spotify Integration Layer
//!     ├── Library aggregation (concurrent fan-out/fan-in)
//!     ├── Pagination (offset/limit walk with ceilings)
//!     ├── Request execution (bearer auth, 401/429 classification)
//!     └── Transport (reqwest, or a fake in tests)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Transport
//!
//! [`transport`] - the [`transport::HttpTransport`] trait plus the production
//! implementation on top of one shared `reqwest::Client`. The trait returns
//! every response, including errors, so classification stays in one place.
//!
//! ### Request Executor
//!
//! [`client`] - [`client::SpotifyClient`] attaches the bearer token, resolves
//! relative endpoints against the API base and classifies responses:
//! - **401**: surfaced as `Error::Authentication`, never retried
//! - **429**: waits for `Retry-After` and resends, bounded by the retry policy
//! - **other non-2xx**: surfaced as `Error::Remote` with the status code
//!
//! ### Pagination
//!
//! [`paging`] - walks an offset/limit endpoint until a short page or the item
//! ceiling. A page that cannot be decoded is skipped instead of failing the
//! whole walk.
//!
//! ### Library Aggregation
//!
//! [`library`] - fetches liked tracks, playlists and albums concurrently.
//! Playlist tracks are a second-level pagination per playlist, each in its own
//! task, joined before the playlist collection is complete.
//!
//! ### Playlist Management
//!
//! [`playlist`] - creates a private playlist and appends tracks in batches of
//! 100.
//!
//! ### Authentication
//!
//! [`auth`] - refresh-grant token exchange with client credentials. The
//! executor does not refresh on its own; see the function docs.
//!
//! ## API Coverage
//!
//! - `GET /me` - current user
//! - `GET /me/tracks` - saved tracks (page size 50)
//! - `GET /me/playlists` - playlist summaries (page size 20)
//! - `GET {playlist tracks href}` - tracks of one playlist
//! - `GET /me/albums` - saved albums with their embedded track list (page size 50)
//! - `POST /users/{user_id}/playlists` - create playlist
//! - `POST /playlists/{playlist_id}/tracks` - add tracks
//! - `POST {token url}` - refresh grant
//!
//! ## Thread Safety
//!
//! All operations are async. The client is `Clone` and shares its transport,
//! so it can be moved into spawned tasks. There is no global mutable state.

pub mod auth;
pub mod client;
pub mod library;
pub mod paging;
pub mod playlist;
pub mod transport;

pub use client::SpotifyClient;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
