mod common;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::json;

use common::{FakeTransport, TOKEN_URL, config, json_response};
use pumpkin::{config::Config, error::Error, spotify::auth::refresh_access_token};

fn config_with_credentials() -> Config {
    let mut config = config();
    config.token_url = TOKEN_URL.to_string();
    config.client_id = Some("client".to_string());
    config.client_secret = Some("secret".to_string());
    config
}

#[tokio::test]
async fn test_refresh_request_shape() {
    let fake = FakeTransport::new();
    fake.respond_json(
        TOKEN_URL,
        json!({ "access_token": "fresh", "scope": "user-library-read", "expires_in": 3600 }),
    );

    let token = refresh_access_token(&*fake, &config_with_credentials(), "r1")
        .await
        .unwrap();

    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.refresh_token, "r1");
    assert_eq!(token.expires_in, 3600);

    let request = &fake.requests()[0];
    assert_eq!(request.url, TOKEN_URL);
    assert_eq!(
        request.headers.get("Authorization"),
        Some(&format!("Basic {}", STANDARD.encode("client:secret")))
    );
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    let body = String::from_utf8(request.body.clone().unwrap()).unwrap();
    assert_eq!(body, "grant_type=refresh_token&refresh_token=r1");
}

#[tokio::test]
async fn test_rotated_refresh_token_is_kept() {
    let fake = FakeTransport::new();
    fake.respond_json(
        TOKEN_URL,
        json!({ "access_token": "fresh", "refresh_token": "r2" }),
    );

    let token = refresh_access_token(&*fake, &config_with_credentials(), "r1")
        .await
        .unwrap();

    assert_eq!(token.refresh_token, "r2");
}

#[tokio::test]
async fn test_rejected_grant_is_an_authentication_error() {
    let fake = FakeTransport::new();
    fake.respond(
        TOKEN_URL,
        json_response(400, json!({ "error": "invalid_grant" })),
    );

    let err = refresh_access_token(&*fake, &config_with_credentials(), "r1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication));
}

#[tokio::test]
async fn test_missing_credentials_are_a_config_error() {
    let fake = FakeTransport::new();

    let err = refresh_access_token(&*fake, &config(), "r1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
    assert!(fake.requests().is_empty());
}
