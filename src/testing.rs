//! In-process fake of the platform backend for tests.
//!
//! Serves the admin endpoints from in-memory JSON records on
//! `127.0.0.1:0`, enforces the bearer token, records every request, and
//! lets a test force a status for a given method + path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::api::ApiClient;
use crate::config::{Config, Timeouts};
use crate::models::AdminProfile;
use crate::routes::NavigationLog;
use crate::session::SessionStore;
use crate::session::storage::{MemoryStorage, TOKEN_KEY, USER_KEY};

pub(crate) const ADMIN_EMAIL: &str = "admin@example.com";
pub(crate) const ADMIN_PASSWORD: &str = "correct-horse";
pub(crate) const ADMIN_TOKEN: &str = "tok-admin-1";

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
pub(crate) struct BackendState {
    pub users: Vec<Value>,
    pub shops: Vec<Value>,
    pub login_override: Option<Value>,
    pub forced: HashMap<(Method, String), (StatusCode, Value)>,
    pub requests: Vec<RecordedRequest>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    /// Backend seeded with four users and two shops.
    pub(crate) fn seeded() -> Self {
        let backend = Self::default();
        {
            let mut s = backend.state.lock().unwrap();
            s.users = fixture_users();
            s.shops = fixture_shops();
        }
        backend
    }

    pub(crate) fn with_users(self, users: Vec<Value>) -> Self {
        self.state.lock().unwrap().users = users;
        self
    }

    pub(crate) fn login_returns(&self, body: Value) {
        self.state.lock().unwrap().login_override = Some(body);
    }

    /// Answer `method path` with `status` and `body` from now on.
    pub(crate) fn force(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.state
            .lock()
            .unwrap()
            .forced
            .insert((method, path.to_string()), (status, body));
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub(crate) fn user(&self, id: &str) -> Option<Value> {
        self.state.lock().unwrap().users.iter().find(|u| u["id"] == id).cloned()
    }

    pub(crate) fn shop(&self, id: &str) -> Option<Value> {
        self.state.lock().unwrap().shops.iter().find(|s| s["id"] == id).cloned()
    }

    /// Serve on an ephemeral port; returns the base URL.
    pub(crate) async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

/// A base URL nothing listens on.
pub(crate) async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn admin_profile() -> AdminProfile {
    AdminProfile {
        id: "admin-1".into(),
        email: ADMIN_EMAIL.into(),
        username: Some("root".into()),
        firstname: None,
        lastname: None,
        role: Some("admin".into()),
    }
}

/// Client wired to a memory-backed session store and a navigation recorder.
pub(crate) struct Harness {
    pub client: ApiClient,
    pub session: Arc<SessionStore>,
    pub storage: Arc<MemoryStorage>,
    pub navigation: Arc<NavigationLog>,
}

impl Harness {
    pub(crate) fn new(base_url: &str) -> Self {
        Self::with_storage(base_url, Arc::new(MemoryStorage::new()))
    }

    /// Harness whose storage already holds a valid admin session.
    pub(crate) fn logged_in(base_url: &str) -> Self {
        let user = serde_json::to_string(&admin_profile()).unwrap();
        let storage = MemoryStorage::new().with(TOKEN_KEY, ADMIN_TOKEN).with(USER_KEY, &user);
        Self::with_storage(base_url, Arc::new(storage))
    }

    pub(crate) fn with_storage(base_url: &str, storage: Arc<MemoryStorage>) -> Self {
        let config = Config {
            api_base_url: base_url.to_string(),
            session_dir: std::env::temp_dir(),
            timeouts: Timeouts { request_secs: 5, connect_secs: 2 },
        };
        let session = Arc::new(SessionStore::restore(Arc::clone(&storage)));
        let navigation = Arc::new(NavigationLog::new());
        let client = ApiClient::new(&config, Arc::clone(&session), navigation.clone()).unwrap();
        Self { client, session, storage, navigation }
    }
}

fn fixture_users() -> Vec<Value> {
    vec![
        json!({
            "id": "u1", "email": "ada@example.com", "username": "ada",
            "firstname": "Ada", "lastname": "Lovelace", "role": "user",
            "isStreamer": false, "is_verified": true, "phoneNumber": "111",
            "createdAt": "2024-01-02T03:04:05.000Z", "updatedAt": "2024-01-02T03:04:05.000Z",
            "shop": { "id": "s1", "name": "Looms", "address": "1 Engine Rd", "phone": "1",
                      "email": "looms@example.com", "ifu": "IFU-1", "isActive": false }
        }),
        json!({
            "id": "u2", "email": "grace@example.com", "username": "grace",
            "firstname": "Grace", "lastname": "Hopper", "role": "streamer",
            "isStreamer": true, "is_verified": true,
            "createdAt": "2024-02-02T03:04:05.000Z", "updatedAt": "2024-02-02T03:04:05.000Z",
            "shop": { "id": "s2", "name": "Compilers", "address": "2 Navy Yard", "phone": "2",
                      "email": "compilers@example.com", "ifu": "IFU-2", "isActive": true }
        }),
        json!({
            "id": "u3", "email": "linus@example.com", "username": "linus",
            "firstname": "Linus", "lastname": "T", "role": "user",
            "isStreamer": false, "is_verified": false
        }),
        json!({
            "id": "u4", "email": "barbara@example.com", "username": "barbara",
            "firstname": "Barbara", "lastname": "Liskov", "role": "streamer",
            "isStreamer": true, "is_verified": false
        }),
    ]
}

fn fixture_shops() -> Vec<Value> {
    vec![
        json!({
            "id": "s1", "name": "Looms", "address": "1 Engine Rd", "phone": "1",
            "email": "looms@example.com", "ifu": "IFU-1", "isActive": false,
            "user": { "id": "u1", "email": "ada@example.com", "firstname": "Ada", "lastname": "Lovelace" }
        }),
        json!({
            "id": "s2", "name": "Compilers", "address": "2 Navy Yard", "phone": "2",
            "email": "compilers@example.com", "ifu": "IFU-2", "isActive": true,
            "website": "https://compilers.example.com",
            "user": { "id": "u2", "email": "grace@example.com", "firstname": "Grace", "lastname": "Hopper" }
        }),
    ]
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, axum::Json(body)).into_response()
}

fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
    }
}

async fn handle(State(backend): State<FakeBackend>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body_json: Option<Value> = serde_json::from_slice(&body).ok();

    let mut s = backend.state.lock().unwrap();
    s.requests.push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        body: body_json.clone(),
    });

    if let Some((status, forced)) = s.forced.get(&(method.clone(), path.clone())) {
        return reply(*status, forced.clone());
    }

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    if method == Method::POST && segments == ["auth", "admin", "login"] {
        if let Some(body) = s.login_override.clone() {
            return reply(StatusCode::OK, body);
        }
        let creds = body_json.unwrap_or(Value::Null);
        if creds["email"] == ADMIN_EMAIL && creds["password"] == ADMIN_PASSWORD {
            return reply(StatusCode::OK, json!({ "access_token": ADMIN_TOKEN, "user": admin_profile() }));
        }
        return reply(StatusCode::UNAUTHORIZED, json!({ "statusCode": 401, "message": "Invalid credentials" }));
    }

    if authorization.as_deref() != Some(&format!("Bearer {ADMIN_TOKEN}")) {
        return reply(StatusCode::UNAUTHORIZED, json!({ "statusCode": 401, "message": "Unauthorized" }));
    }

    let not_found = || reply(StatusCode::NOT_FOUND, json!({ "statusCode": 404, "message": "Not found" }));

    match (method, segments.as_slice()) {
        (Method::GET, ["users"]) => reply(StatusCode::OK, Value::Array(s.users.clone())),
        (Method::GET, ["users", "streamers", "all"]) => {
            let streamers = s.users.iter().filter(|u| u["isStreamer"] == true).cloned().collect();
            reply(StatusCode::OK, Value::Array(streamers))
        }
        (Method::GET, ["users", id]) => match s.users.iter().find(|u| u["id"] == *id) {
            Some(user) => reply(StatusCode::OK, user.clone()),
            None => not_found(),
        },
        (Method::PATCH, ["users", id]) => match s.users.iter_mut().find(|u| u["id"] == *id) {
            Some(user) => {
                merge(user, &body_json.unwrap_or(Value::Null));
                reply(StatusCode::OK, user.clone())
            }
            None => not_found(),
        },
        (Method::DELETE, ["users", id]) => {
            let before = s.users.len();
            s.users.retain(|u| u["id"] != *id);
            if s.users.len() == before { not_found() } else { reply(StatusCode::OK, json!({})) }
        }
        (Method::GET, ["shops"]) => reply(StatusCode::OK, Value::Array(s.shops.clone())),
        (Method::GET, ["shops", id]) => match s.shops.iter().find(|x| x["id"] == *id) {
            Some(shop) => reply(StatusCode::OK, shop.clone()),
            None => not_found(),
        },
        (Method::PATCH, ["shops", id]) => match s.shops.iter_mut().find(|x| x["id"] == *id) {
            Some(shop) => {
                merge(shop, &body_json.unwrap_or(Value::Null));
                reply(StatusCode::OK, shop.clone())
            }
            None => not_found(),
        },
        (Method::DELETE, ["shops", id]) => {
            let before = s.shops.len();
            s.shops.retain(|x| x["id"] != *id);
            if s.shops.len() == before { not_found() } else { reply(StatusCode::OK, json!({})) }
        }
        _ => not_found(),
    }
}
