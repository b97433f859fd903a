mod common;

use std::time::Duration;

use serde_json::json;

use common::{
    API, FakeTransport, full_track, json_response, page, query_param, rate_limited, saved_tracks,
    service, simplified_track, user_json,
};
use pumpkin::{
    error::Error,
    management::{CacheStore, get_json, keys},
    types::{Library, User},
};

fn script_full_library(fake: &FakeTransport) {
    fake.respond_json("/me", user_json("u1"));
    fake.respond_json(
        "/me/tracks",
        page(vec![
            json!({ "track": full_track("liked-1", true) }),
            json!({ "track": full_track("liked-2", false) }),
        ]),
    );
    fake.respond_json(
        "/me/playlists",
        page(vec![
            json!({
                "id": "p1",
                "name": "Morning",
                "tracks": { "href": format!("{}/playlists/p1/tracks", API), "total": 2 }
            }),
            json!({
                "id": "p2",
                "name": "Evening",
                "tracks": { "href": format!("{}/playlists/p2/tracks", API), "total": 1 }
            }),
        ]),
    );
    fake.respond_json(
        "/playlists/p1/tracks",
        page(vec![
            json!({ "track": full_track("p1-a", true) }),
            json!({ "track": null }),
        ]),
    );
    fake.respond_json(
        "/playlists/p2/tracks",
        page(vec![json!({ "track": full_track("p2-a", true) })]),
    );
    fake.respond_json(
        "/me/albums",
        page(vec![json!({
            "album": {
                "id": "a1",
                "name": "Debut",
                "images": [{ "url": "https://img.test/a1.jpg" }],
                "tracks": page(vec![
                    simplified_track("a1-1", true),
                    simplified_track("a1-2", false),
                ])
            }
        })]),
    );
}

fn user() -> User {
    User {
        id: "u1".to_string(),
        display_name: None,
        email: None,
        product: None,
    }
}

#[tokio::test]
async fn test_library_aggregates_all_collections() {
    let fake = FakeTransport::new();
    script_full_library(&fake);
    let (service, _) = service(&fake);

    let library = service.libraries().library(&user(), "tok").await.unwrap();

    let liked: Vec<&str> = library.liked_tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(liked, ["liked-1"]);

    assert_eq!(library.playlists.len(), 2);
    let morning = library.playlists.iter().find(|p| p.id == "p1").unwrap();
    assert_eq!(morning.name, "Morning");
    assert_eq!(morning.tracks.len(), 1);
    assert_eq!(morning.tracks[0].id, "p1-a");

    assert_eq!(library.albums.len(), 1);
    let album = &library.albums[0];
    assert_eq!(album.tracks.len(), 1);
    assert_eq!(album.tracks[0].album_name, "Debut");
    assert_eq!(
        album.tracks[0].cover_url.as_deref(),
        Some("https://img.test/a1.jpg")
    );

    assert_eq!(fake.hits("/playlists/p1/tracks"), 1);
    assert_eq!(fake.hits("/playlists/p2/tracks"), 1);
}

#[tokio::test]
async fn test_cached_library_is_served_without_fetching() {
    let fake = FakeTransport::new();
    script_full_library(&fake);
    let (service, store) = service(&fake);

    let first = service.libraries().library(&user(), "tok").await.unwrap();
    let second = service.libraries().library(&user(), "tok").await.unwrap();

    assert_eq!(first, second);
    for path in ["/me/tracks", "/me/playlists", "/me/albums"] {
        assert_eq!(fake.hits(path), 1, "{path} fetched more than once");
    }
    assert!(store.keys().contains(&keys::library("u1")));
}

#[tokio::test]
async fn test_failed_sub_fetch_caches_nothing() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/tracks", saved_tracks(&["liked-1"]));
    fake.respond_json("/me/playlists", page(vec![]));
    fake.respond("/me/albums", json_response(500, json!({})));
    let (service, store) = service(&fake);

    let err = service
        .libraries()
        .library(&user(), "tok")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Remote { status: 500, .. }));
    assert!(!store.keys().contains(&keys::library("u1")));
}

#[tokio::test]
async fn test_failed_playlist_fails_the_library() {
    let fake = FakeTransport::new();
    fake.respond_json("/me/tracks", page(vec![]));
    fake.respond_json("/me/albums", page(vec![]));
    fake.respond_json(
        "/me/playlists",
        page(vec![json!({
            "id": "p1",
            "name": "Broken",
            "tracks": { "href": format!("{}/playlists/p1/tracks", API), "total": 1 }
        })]),
    );
    fake.respond(
        "/playlists/p1/tracks",
        json_response(401, json!({"error": {"status": 401, "message": "expired"}})),
    );
    let (service, store) = service(&fake);

    let err = service
        .libraries()
        .library(&user(), "tok")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Authentication));
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn test_user_lookup_is_cached_under_token_and_id() {
    let fake = FakeTransport::new();
    fake.respond_json("/me", user_json("u1"));
    let (service, store) = service(&fake);

    let first = service.libraries().user_for_token("tok").await.unwrap();
    let second = service.libraries().user_id_for_token("tok").await.unwrap();

    assert_eq!(first.id, "u1");
    assert_eq!(second, "u1");
    assert_eq!(fake.hits("/me"), 1);

    let live = store.keys();
    assert!(live.contains(&keys::user_by_token("tok")));
    assert!(live.contains(&keys::user_by_id("u1")));
    assert_eq!(
        service.libraries().cached_user("u1").await.unwrap(),
        Some(first)
    );
}

#[tokio::test]
async fn test_each_collection_uses_its_page_size() {
    let fake = FakeTransport::new();
    script_full_library(&fake);
    let (service, _) = service(&fake);

    service.libraries().library(&user(), "tok").await.unwrap();

    for (path, limit) in [
        ("/me/tracks", "50"),
        ("/me/playlists", "20"),
        ("/me/albums", "50"),
        ("/playlists/p1/tracks", "100"),
    ] {
        let requests = fake.requests_to(path);
        assert_eq!(requests.len(), 1, "{path}");
        assert_eq!(query_param(&requests[0], "limit").as_deref(), Some(limit), "{path}");
        assert_eq!(query_param(&requests[0], "offset").as_deref(), Some("0"), "{path}");
    }
}

#[tokio::test]
async fn test_liked_tracks_stop_at_their_ceiling() {
    let fake = FakeTransport::new();
    let ids: Vec<String> = (0..50).map(|i| format!("t{}", i)).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    fake.respond_json("/me/tracks", saved_tracks(&id_refs));
    fake.respond_json("/me/playlists", page(vec![]));
    fake.respond_json("/me/albums", page(vec![]));
    let (service, _) = service(&fake);

    service.libraries().library(&user(), "tok").await.unwrap();

    let offsets: Vec<String> = fake
        .requests_to("/me/tracks")
        .iter()
        .filter_map(|r| query_param(r, "offset"))
        .collect();
    assert_eq!(offsets, ["0", "50", "100"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_import_stops_playlist_fetches() {
    let fake = FakeTransport::new();
    fake.respond("/me/tracks", rate_limited(Some("1")))
        .respond("/me/tracks", json_response(500, json!({})));
    fake.respond_json("/me/albums", page(vec![]));
    fake.respond_json(
        "/me/playlists",
        page(vec![json!({
            "id": "p1",
            "name": "Throttled",
            "tracks": { "href": format!("{}/playlists/p1/tracks", API), "total": 1 }
        })]),
    );
    fake.respond("/playlists/p1/tracks", rate_limited(Some("2")));
    let (service, _) = service(&fake);

    let err = service
        .libraries()
        .library(&user(), "tok")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Remote { status: 500, .. }));

    let at_failure = fake.hits("/playlists/p1/tracks");
    tokio::time::advance(Duration::from_secs(120)).await;
    tokio::task::yield_now().await;

    assert_eq!(fake.hits("/playlists/p1/tracks"), at_failure);
}

#[tokio::test]
async fn test_undecodable_cached_library_is_replaced() {
    let fake = FakeTransport::new();
    script_full_library(&fake);
    let (service, store) = service(&fake);
    let key = keys::library("u1");
    store
        .set(&key, r#"{"stale":true}"#, Duration::from_secs(3600))
        .await
        .unwrap();

    let first = service.libraries().library(&user(), "tok").await.unwrap();
    let second = service.libraries().library(&user(), "tok").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fake.hits("/me/tracks"), 1);
    let cached: Option<Library> = get_json(&*store, &key).await.unwrap();
    assert_eq!(cached, Some(first));
}
