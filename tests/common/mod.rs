#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::{Value, json};

use pumpkin::{
    config::Config,
    error::Result,
    management::MemoryCacheStore,
    service::ShareService,
    spotify::{HttpRequest, HttpResponse, HttpTransport},
};

pub const API: &str = "https://api.test/v1";
pub const TOKEN_URL: &str = "https://accounts.test/api/token";

/// Scripted stand-in for the Spotify Web API.
///
/// Responses are queued per path (relative to [`API`], query stripped). The
/// last queued response of a path is repeated once the queue runs dry.
/// Unknown paths answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, path: &str, response: HttpResponse) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn respond_json(&self, path: &str, body: Value) -> &Self {
        self.respond(path, json_response(200, body))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| route_of(&r.url) == path)
            .collect()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let route = route_of(&request.url);
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&route) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| {
            json_response(
                404,
                json!({"error": {"status": 404, "message": "Non existing id"}}),
            )
        }))
    }
}

/// Path of a request URL relative to [`API`], without the query string.
/// URLs outside the API base keep their full form.
pub fn route_of(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    without_query
        .strip_prefix(API)
        .unwrap_or(without_query)
        .to_string()
}

/// Value of a query parameter of a recorded request.
pub fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
    let (_, query) = request.url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

pub fn json_body(request: &HttpRequest) -> Value {
    serde_json::from_slice(request.body.as_deref().unwrap_or(b"null")).unwrap()
}

pub fn json_response(status: u16, body: Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: HashMap::new(),
        body: serde_json::to_vec(&body).unwrap(),
    }
}

pub fn rate_limited(retry_after: Option<&str>) -> HttpResponse {
    let mut response = json_response(
        429,
        json!({"error": {"status": 429, "message": "API rate limit exceeded"}}),
    );
    if let Some(value) = retry_after {
        response
            .headers
            .insert("retry-after".to_string(), value.to_string());
    }
    response
}

pub fn page(items: Vec<Value>) -> Value {
    let total = items.len();
    json!({ "items": items, "total": total, "next": null })
}

/// Full track object as `/me/tracks` and playlist pages embed it.
pub fn full_track(id: &str, with_preview: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Track {}", id),
        "preview_url": preview(id, with_preview),
        "album": {
            "name": format!("Album of {}", id),
            "images": [{ "url": format!("https://img.test/{}.jpg", id) }]
        },
        "artists": [{ "name": "Artist" }]
    })
}

/// Track object as an album's track page carries it.
pub fn simplified_track(id: &str, with_preview: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Track {}", id),
        "preview_url": preview(id, with_preview),
        "artists": [{ "name": "Artist" }]
    })
}

fn preview(id: &str, with_preview: bool) -> Value {
    if with_preview {
        json!(format!("https://p.test/{}.mp3", id))
    } else {
        Value::Null
    }
}

pub fn saved_tracks(ids: &[&str]) -> Value {
    page(
        ids.iter()
            .map(|id| json!({ "track": full_track(id, true) }))
            .collect(),
    )
}

pub fn user_json(id: &str) -> Value {
    json!({ "id": id, "display_name": format!("User {}", id), "product": "premium" })
}

/// A library with the given liked tracks and neither playlists nor albums.
pub fn script_liked_only(fake: &FakeTransport, user_id: &str, liked: &[&str]) {
    fake.respond_json("/me", user_json(user_id));
    fake.respond_json("/me/tracks", saved_tracks(liked));
    fake.respond_json("/me/playlists", page(vec![]));
    fake.respond_json("/me/albums", page(vec![]));
}

pub fn config() -> Config {
    Config::default().with_api_url(API)
}

pub fn service(fake: &Arc<FakeTransport>) -> (ShareService, Arc<MemoryCacheStore>) {
    let store = Arc::new(MemoryCacheStore::new());
    let service = ShareService::new(&config(), fake.clone(), store.clone());
    (service, store)
}
