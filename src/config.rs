//! Configuration management for pumpkin.
//!
//! This module handles loading configuration values from environment variables
//! and `.env` files, and turns them into one explicit [`Config`] value that is
//! built once at process start and handed to every component constructor.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except client credentials has one)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";

const ONE_MINUTE: u64 = 60;
const ONE_HOUR: u64 = 60 * ONE_MINUTE;
const ONE_DAY: u64 = 24 * ONE_HOUR;
const ONE_WEEK: u64 = 7 * ONE_DAY;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `pumpkin/.env` inside the platform-specific
/// local data directory:
/// - Linux: `~/.local/share/pumpkin/.env`
/// - macOS: `~/Library/Application Support/pumpkin/.env`
/// - Windows: `%LOCALAPPDATA%/pumpkin/.env`
///
/// A missing file is not an error; every setting has either a default or is
/// only needed by optional features (token refresh).
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<()> {
    let mut path = data_dir();
    path.push(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| Error::Config(format!("cannot load {}: {}", path.display(), e)))
}

/// Root of all pumpkin files in the local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("pumpkin");
    path
}

/// Retry behaviour of the request executor when the remote answers 429.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; the next 429 is fatal.
    pub max_retries: u32,
    /// Exponential floor applied on top of `Retry-After`.
    pub base_delay: Duration,
    /// Cap for the exponential floor.
    pub max_delay: Duration,
    /// A `Retry-After` above this is not waited for.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            max_retry_after: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based) given the server's hint.
    pub fn delay_for(&self, attempt: u32, retry_after: Duration) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        let floor = self.base_delay.saturating_mul(factor).min(self.max_delay);
        retry_after.max(floor)
    }
}

/// Page sizes and item ceilings per collection type.
#[derive(Debug, Clone)]
pub struct PagingLimits {
    pub tracks_page: usize,
    pub tracks_ceiling: usize,
    pub playlists_page: usize,
    pub playlists_ceiling: usize,
    pub albums_page: usize,
    pub albums_ceiling: usize,
    pub playlist_tracks_page: usize,
    pub playlist_tracks_ceiling: usize,
}

impl Default for PagingLimits {
    fn default() -> Self {
        Self {
            tracks_page: 50,
            tracks_ceiling: 150,
            playlists_page: 20,
            playlists_ceiling: 100,
            albums_page: 50,
            albums_ceiling: 100,
            playlist_tracks_page: 100,
            playlist_tracks_ceiling: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheTtl {
    pub user: Duration,
    pub token: Duration,
    pub library: Duration,
    pub share: Duration,
    pub likes: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            user: Duration::from_secs(ONE_HOUR),
            token: Duration::from_secs(20 * ONE_MINUTE),
            library: Duration::from_secs(ONE_WEEK),
            share: Duration::from_secs(ONE_WEEK),
            likes: Duration::from_secs(ONE_WEEK),
        }
    }
}

/// Bounds of the shareable sample.
#[derive(Debug, Clone)]
pub struct SampleLimits {
    pub liked_tracks: usize,
    pub albums: usize,
    pub playlists: usize,
    pub tracks_per_collection: usize,
    pub max_tracks: usize,
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            liked_tracks: 100,
            albums: 100,
            playlists: 100,
            tracks_per_collection: 100,
            max_tracks: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub server_addr: SocketAddr,
    pub cache_dir: PathBuf,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
    pub paging: PagingLimits,
    pub ttl: CacheTtl,
    pub sample: SampleLimits,
}

impl Default for Config {
    fn default() -> Self {
        let mut cache_dir = data_dir();
        cache_dir.push("cache");

        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: None,
            client_secret: None,
            server_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            cache_dir,
            request_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            paging: PagingLimits::default(),
            ttl: CacheTtl::default(),
            sample: SampleLimits::default(),
        }
    }
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// Reads:
    /// - `SPOTIFY_API_URL` - Web API base URL
    /// - `SPOTIFY_API_TOKEN_URL` - token endpoint used for the refresh grant
    /// - `SPOTIFY_API_AUTH_CLIENT_ID` / `SPOTIFY_API_AUTH_CLIENT_SECRET` - client credentials
    /// - `SERVER_ADDRESS` - bind address of the HTTP surface
    /// - `PUMPKIN_CACHE_DIR` - directory of the file cache store
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `SERVER_ADDRESS` is not a socket address.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(url) = var("SPOTIFY_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = var("SPOTIFY_API_TOKEN_URL") {
            config.token_url = url;
        }
        config.client_id = var("SPOTIFY_API_AUTH_CLIENT_ID");
        config.client_secret = var("SPOTIFY_API_AUTH_CLIENT_SECRET");

        let addr = var("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        config.server_addr = SocketAddr::from_str(&addr)
            .map_err(|e| Error::Config(format!("SERVER_ADDRESS '{}': {}", addr, e)))?;

        if let Some(dir) = var("PUMPKIN_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Same defaults, pointed at another API base. Used against local fakes.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_wins_over_small_floor() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for(0, Duration::from_secs(2)),
            Duration::from_secs(2)
        );
    }

    #[test]
    fn floor_grows_exponentially_and_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(3, Duration::ZERO), Duration::from_secs(8));
        assert_eq!(policy.delay_for(30, Duration::ZERO), Duration::from_secs(60));
    }

    #[test]
    fn default_ttls_never_zero() {
        let ttl = CacheTtl::default();
        for d in [ttl.user, ttl.token, ttl.library, ttl.share, ttl.likes] {
            assert!(d > Duration::ZERO);
        }
        assert_eq!(ttl.library, Duration::from_secs(7 * 24 * 60 * 60));
    }
}
