use std::{sync::Arc, time::Duration};

use reqwest::Url;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::{Config, RetryPolicy},
    error::{Error, Result},
    spotify::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport},
    types::User,
};

/// Rate-limited request executor for the Spotify Web API.
///
/// Every call carries `Authorization: Bearer <token>`. Responses are
/// classified as follows:
///
/// - `2xx` - returned to the caller
/// - `401` - [`Error::Authentication`], never retried here
/// - `429` - waits for `Retry-After` (with an exponential floor) and resends
///   the identical request, up to [`RetryPolicy::max_retries`] times
/// - anything else - [`Error::Remote`] carrying the status code
///
/// Cloning is cheap; clones share the same transport.
#[derive(Clone)]
pub struct SpotifyClient {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    retry: RetryPolicy,
}

impl SpotifyClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &Config) -> Self {
        Self {
            transport,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            retry: config.retry.clone(),
        }
    }

    /// Resolves an endpoint against the API base. Absolute URLs, such as the
    /// pagination handles the API hands out, are used as they are.
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!(
                "{uri}/{path}",
                uri = self.api_url,
                path = endpoint.trim_start_matches('/')
            )
        }
    }

    /// Sends one request and classifies the answer.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method
    /// * `endpoint` - path relative to the API base, or an absolute URL
    /// * `token` - access token sent as `Authorization: Bearer`
    /// * `query` - query parameters, appended URL-encoded
    /// * `body` - JSON body, if any
    ///
    /// # Returns
    ///
    /// The raw 2xx response.
    ///
    /// # Errors
    ///
    /// - `Error::Authentication` on 401
    /// - `Error::RateLimited` when 429 persists past the retry budget or the
    ///   server asks for more than `max_retry_after`
    /// - `Error::RetryAfterUnparseable` on 429 without a numeric `Retry-After`
    /// - `Error::Remote` on any other non-2xx status
    /// - `Error::Http` when the transport fails
    pub async fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        token: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let mut url = self.url(endpoint);
        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query)
                .map_err(|e| Error::BadRequest(format!("cannot encode query: {}", e)))?;
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&encoded);
        }

        let mut request = HttpRequest::new(method, url).bearer_token(token);
        if let Some(body) = body {
            request = request.json_body(body);
        }

        let mut attempt = 0;
        loop {
            debug!(method = ?request.method, url = %request.url, attempt, "spotify request");
            let response = self.transport.execute(request.clone()).await?;

            if response.is_success() {
                return Ok(response);
            }

            match response.status {
                401 => return Err(Error::Authentication),
                429 => {
                    let retry_after = parse_retry_after(&response)?;

                    if retry_after > self.retry.max_retry_after {
                        warn!(
                            url = %request.url,
                            retry_after = retry_after.as_secs(),
                            "Retry-After is abnormally high, giving up"
                        );
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after.as_secs(),
                        });
                    }

                    if attempt >= self.retry.max_retries {
                        warn!(url = %request.url, attempt, "still rate limited, retry budget spent");
                        return Err(Error::RateLimited {
                            retry_after_seconds: retry_after.as_secs(),
                        });
                    }

                    let delay = self.retry.delay_for(attempt, retry_after);
                    warn!(url = %request.url, delay_ms = delay.as_millis() as u64, "rate limited");
                    sleep(delay).await;
                    attempt += 1;
                }
                status => {
                    return Err(Error::Remote {
                        status,
                        message: error_message(&response),
                    });
                }
            }
        }
    }

    /// `GET` an endpoint and decode the JSON body into `T`. A body that does
    /// not decode is `Error::Deserialization`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute(HttpMethod::Get, endpoint, token, query, None)
            .await?
            .json()
    }

    /// `POST` `body` as JSON and decode the answer into `T`.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_vec(body)?;
        self.execute(HttpMethod::Post, endpoint, token, &[], Some(body))
            .await?
            .json()
    }

    /// `GET /me` - the user the token belongs to.
    pub async fn me(&self, token: &str) -> Result<User> {
        self.get("/me", token, &[]).await
    }
}

/// Joins `segments` into an absolute path, percent-encoding each one so
/// that ids cannot change the request target.
///
/// ```text
/// ["users", "a/b", "playlists"] -> "/users/a%2Fb/playlists"
/// ```
pub fn encoded_path(segments: &[&str]) -> Result<String> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| Error::BadRequest(format!("cannot build request path: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| Error::BadRequest("cannot build request path".into()))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

fn parse_retry_after(response: &HttpResponse) -> Result<Duration> {
    let raw = response.header("retry-after");
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .ok_or_else(|| Error::RetryAfterUnparseable(raw.map(str::to_string)))
}

// Spotify wraps failures as {"error": {"status": 400, "message": "..."}}.
fn error_message(response: &HttpResponse) -> String {
    serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| response.text())
}
