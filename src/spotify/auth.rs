use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{
    config::Config,
    error::{Error, Result},
    spotify::transport::{HttpMethod, HttpRequest, HttpTransport},
    types::Token,
};

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchanges a refresh token for a fresh access token.
///
/// Uses the `refresh_token` grant against the configured token endpoint,
/// authenticated with the client credentials as HTTP Basic auth. The request
/// executor never calls this on its own: a 401 from the Web API is surfaced
/// as `Error::Authentication` and it is up to the caller to refresh and retry.
///
/// # Returns
///
/// A new `Token`. When Spotify does not rotate the refresh token, the one
/// passed in is kept.
///
/// # Errors
///
/// - `Error::Config` if client id or secret are missing
/// - `Error::Authentication` if the token endpoint rejects the grant
/// - `Error::Remote` for any other non-2xx answer
pub async fn refresh_access_token(
    transport: &dyn HttpTransport,
    config: &Config,
    refresh_token: &str,
) -> Result<Token> {
    let (Some(client_id), Some(client_secret)) = (&config.client_id, &config.client_secret)
    else {
        return Err(Error::Config(
            "SPOTIFY_API_AUTH_CLIENT_ID and SPOTIFY_API_AUTH_CLIENT_SECRET are required to refresh tokens"
                .into(),
        ));
    };

    let form = serde_urlencoded::to_string([
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
    ])
    .map_err(|e| Error::BadRequest(e.to_string()))?;
    let credentials = STANDARD.encode(format!("{}:{}", client_id, client_secret));

    let request = HttpRequest::new(HttpMethod::Post, &config.token_url)
        .header("Authorization", format!("Basic {}", credentials))
        .form_body(form);

    let response = transport.execute(request).await?;
    if !response.is_success() {
        return Err(match response.status {
            400 | 401 => Error::Authentication,
            status => Error::Remote {
                status,
                message: response.text(),
            },
        });
    }

    let json: RefreshResponse = response.json()?;
    info!("access token refreshed");

    Ok(Token {
        access_token: json.access_token,
        refresh_token: json
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        scope: json.scope,
        expires_in: json.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
