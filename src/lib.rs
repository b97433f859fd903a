//! Pumpkin: share a sampled snapshot of a Spotify library
//!
//! This library fetches a user's Spotify catalog (liked tracks, playlists,
//! albums) with an OAuth access token, caches it with time-bounded validity
//! and derives a bounded, deduplicated sample of tracks that can be read back
//! by anyone holding the opaque share id.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the share server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error taxonomy shared by all layers
//! - `management` - Cache store, cache-aside library access and the share index
//! - `sampler` - Shareable sample construction
//! - `server` - axum router and listener
//! - `service` - The core contract used by the HTTP layer and the CLI
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pumpkin::{config::Config, management::MemoryCacheStore, service::ShareService, spotify::ReqwestTransport};
//!
//! #[tokio::main]
//! async fn main() -> pumpkin::error::Result<()> {
//!     let config = Config::from_env()?;
//!     let transport = Arc::new(ReqwestTransport::new(config.request_timeout)?);
//!     let service = ShareService::new(&config, transport, Arc::new(MemoryCacheStore::new()));
//!     let share_id = service.initialize_shared_library("BQC...").await?;
//!     println!("{}", share_id);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod sampler;
pub mod server;
pub mod service;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Used for general status updates on the command line. Diagnostics that
/// belong in logs go through `tracing` instead.
///
/// # Example
///
/// ```
/// info!("Importing library...");
/// info!("Share holds {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Share created: {}", share_id);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors at the command line; library code returns
/// `error::Result` instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Share {} has expired", share_id);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
