//! # CLI Module
//!
//! Command-line layer of pumpkin. Each command builds a
//! [`crate::service::ShareService`] from the configuration, runs one
//! operation and reports the outcome with the colored status macros.
//!
//! ## Commands
//!
//! - [`serve`] - runs the HTTP server
//! - [`import`] - imports the library behind an access token and prints the share id
//! - [`tracks`] - prints a window of a shared sample as a table
//! - [`user`] - prints the owner of a share
//! - [`like`] - records liked tracks of a shared library
//! - [`likes`] - prints the liked tracks of a listener
//! - [`create_playlist`] - creates a private playlist from track ids, or from
//!   the likes when no ids are given
//!
//! ## Storage
//!
//! Everything except `serve --in-memory` uses the file cache store under the
//! configured cache directory, so a share created by `import` can be read by
//! a later `tracks` call until it expires.
//!
//! ## Usage Patterns
//!
//! ```bash
//! pumpkin import --token BQC...            # prints e.g. AbC12345
//! pumpkin tracks AbC12345 --limit 20       # first 20 shared tracks
//! pumpkin user AbC12345                    # who shared it
//! pumpkin like --user-id me --library-user-id u1 --track 4uLU6hMCjMI75M1A2tKUQC
//! pumpkin create-playlist --token BQC... --user-id me --name "From u1"
//! pumpkin serve                            # HTTP API on SERVER_ADDRESS
//! ```

mod like;
mod playlist;
mod serve;
mod share;

use std::sync::Arc;

pub use like::{like, likes};
pub use playlist::create_playlist;
pub use serve::serve;
pub use share::{import, tracks, user};

use crate::{
    config::Config,
    error,
    management::{CacheStore, FileCacheStore, MemoryCacheStore},
    service::ShareService,
    spotify::ReqwestTransport,
};

pub(crate) fn transport(config: &Config) -> Arc<ReqwestTransport> {
    match ReqwestTransport::new(config.request_timeout) {
        Ok(transport) => Arc::new(transport),
        Err(e) => error!("Cannot build HTTP client. Err: {}", e),
    }
}

pub(crate) fn build_service(config: &Config, in_memory: bool) -> ShareService {
    let store: Arc<dyn CacheStore> = if in_memory {
        Arc::new(MemoryCacheStore::new())
    } else {
        Arc::new(FileCacheStore::new(&config.cache_dir))
    };

    ShareService::new(config, transport(config), store)
}
