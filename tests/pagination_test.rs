mod common;

use serde_json::{Value, json};

use common::{FakeTransport, config, json_response, page, query_param};
use pumpkin::{
    error::Error,
    spotify::{
        SpotifyClient,
        paging::{Pagination, fetch_all},
    },
};

fn items(count: usize, from: usize) -> Value {
    page((from..from + count).map(|i| json!({ "n": i })).collect())
}

#[tokio::test]
async fn test_short_page_ends_the_walk() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/tracks", items(50, 0))
        .respond_json("/me/tracks", items(50, 50))
        .respond_json("/me/tracks", items(30, 100));
    let client = SpotifyClient::new(fake.clone(), &config());

    let all: Vec<Value> = fetch_all(&client, "tok", Pagination::new("/me/tracks", 50, 500))
        .await
        .unwrap();

    assert_eq!(all.len(), 130);
    assert_eq!(all[0]["n"], 0);
    assert_eq!(all[129]["n"], 129);

    let requests = fake.requests_to("/me/tracks");
    assert_eq!(requests.len(), 3);
    let offsets: Vec<String> = requests
        .iter()
        .filter_map(|r| query_param(r, "offset"))
        .collect();
    assert_eq!(offsets, ["0", "50", "100"]);
    assert!(requests.iter().all(|r| query_param(r, "limit").as_deref() == Some("50")));
}

#[tokio::test]
async fn test_ceiling_stops_the_walk() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/tracks", items(50, 0));
    let client = SpotifyClient::new(fake.clone(), &config());

    let all: Vec<Value> = fetch_all(&client, "tok", Pagination::new("/me/tracks", 50, 150))
        .await
        .unwrap();

    assert_eq!(all.len(), 150);
    assert_eq!(fake.hits("/me/tracks"), 3);
}

#[tokio::test]
async fn test_empty_collection_takes_one_request() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/albums", page(vec![]));
    let client = SpotifyClient::new(fake.clone(), &config());

    let all: Vec<Value> = fetch_all(&client, "tok", Pagination::new("/me/albums", 50, 100))
        .await
        .unwrap();

    assert!(all.is_empty());
    assert_eq!(fake.hits("/me/albums"), 1);
}

#[tokio::test]
async fn test_malformed_page_is_skipped() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/tracks", items(50, 0))
        .respond_json("/me/tracks", json!({ "items": "not a list" }))
        .respond_json("/me/tracks", items(10, 100));
    let client = SpotifyClient::new(fake.clone(), &config());

    let all: Vec<Value> = fetch_all(&client, "tok", Pagination::new("/me/tracks", 50, 500))
        .await
        .unwrap();

    assert_eq!(all.len(), 60);
    let offsets: Vec<String> = fake
        .requests_to("/me/tracks")
        .iter()
        .filter_map(|r| query_param(r, "offset"))
        .collect();
    assert_eq!(offsets, ["0", "50", "100"]);
}

#[tokio::test]
async fn test_remote_failure_aborts_the_walk() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/tracks", items(50, 0))
        .respond("/me/tracks", json_response(503, json!({})));
    let client = SpotifyClient::new(fake.clone(), &config());

    let err = fetch_all::<Value>(&client, "tok", Pagination::new("/me/tracks", 50, 500))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { status: 503, .. }));
    assert_eq!(fake.hits("/me/tracks"), 2);
}

#[tokio::test]
async fn test_zero_page_size_is_rejected() {
    let fake = FakeTransport::new();
    let client = SpotifyClient::new(fake.clone(), &config());

    let err = fetch_all::<Value>(&client, "tok", Pagination::new("/me/tracks", 0, 100))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BadRequest(_)));
    assert!(fake.requests().is_empty());
}
