use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Remote answered 401; the access token is invalid or expired.
    #[error("Spotify rejected the access token")]
    Authentication,

    /// Remote kept answering 429 past the retry budget, or asked for an
    /// unreasonable delay.
    #[error("Rate limit exceeded, retry after {retry_after_seconds} seconds")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Rate limited without a usable Retry-After header: {0:?}")]
    RetryAfterUnparseable(Option<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A response body did not match the expected shape.
    #[error("Failed to parse API response: {0}")]
    Deserialization(String),

    #[error("Spotify API error {status}: {message}")]
    Remote { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    Task(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Only a malformed page may be skipped by the paginated fetcher;
    /// everything else aborts the current operation.
    pub fn is_recoverable_page_error(&self) -> bool {
        matches!(self, Error::Deserialization(_))
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::Authentication => 401,
            Error::NotFound(_) => 404,
            Error::RateLimited { .. } => 429,
            _ => 500,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
