use axum::http::{Method, StatusCode};
use serde_json::json;

use super::*;
use crate::models::{Credentials, UserPatch};
use crate::session::storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use crate::testing::{ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_TOKEN, FakeBackend, Harness, unreachable_base_url};

// =============================================================================
// Outgoing hook
// =============================================================================

#[tokio::test]
async fn attaches_bearer_when_session_present() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);

    let users = h.client.users().list().await.unwrap();
    assert_eq!(users.len(), 4);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some(format!("Bearer {ADMIN_TOKEN}").as_str()));
}

#[tokio::test]
async fn sends_unauthenticated_without_session() {
    let backend = FakeBackend::seeded();
    let h = Harness::new(&backend.spawn().await);

    let err = h.client.users().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(backend.requests()[0].authorization, None);
}

#[tokio::test]
async fn login_request_never_carries_bearer() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);

    h.client
        .auth()
        .login_admin(&Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .unwrap();
    let req = &backend.requests()[0];
    assert_eq!(req.path, "/auth/admin/login");
    assert_eq!(req.authorization, None);
    assert_eq!(req.body.as_ref().unwrap()["email"], ADMIN_EMAIL);
}

// =============================================================================
// Incoming hook
// =============================================================================

#[tokio::test]
async fn unauthorized_clears_session_and_redirects_once() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);
    backend.force(Method::GET, "/shops", StatusCode::UNAUTHORIZED, json!({ "message": "jwt expired" }));
    assert!(h.session.is_authenticated());

    let err = h.client.shops().list().await.unwrap_err();

    assert!(matches!(&err, ApiError::Unauthorized { message: Some(m) } if m == "jwt expired"));
    assert!(!h.session.is_authenticated());
    assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
    assert_eq!(h.storage.get(USER_KEY).unwrap(), None);
    assert_eq!(h.navigation.requested(), vec![Route::Login]);
}

#[tokio::test]
async fn each_unauthorized_response_redirects_once() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);
    backend.force(Method::GET, "/users", StatusCode::UNAUTHORIZED, json!({}));

    let _ = h.client.users().list().await;
    let _ = h.client.users().list().await;

    assert_eq!(h.navigation.requested(), vec![Route::Login, Route::Login]);
}

#[tokio::test]
async fn login_unauthorized_does_not_redirect() {
    let backend = FakeBackend::seeded();
    let h = Harness::new(&backend.spawn().await);

    let err = h
        .client
        .auth()
        .login_admin(&Credentials::new(ADMIN_EMAIL, "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(h.navigation.requested().is_empty());
}

#[tokio::test]
async fn other_statuses_pass_through_untouched() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);
    backend.force(
        Method::PATCH,
        "/users/u1",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "message": ["role must be one of user, streamer"] }),
    );

    let err = h
        .client
        .users()
        .update("u1", &UserPatch::role("wizard", false))
        .await
        .unwrap_err();

    assert!(matches!(&err, ApiError::Backend { status: 422, message: Some(m) } if m == "role must be one of user, streamer"));
    assert!(h.session.is_authenticated());
    assert!(h.navigation.requested().is_empty());
}

#[tokio::test]
async fn transport_failure_is_reported_as_transport() {
    let h = Harness::logged_in(&unreachable_base_url().await);

    let err = h.client.shops().list().await.unwrap_err();

    assert!(err.is_transport());
    assert!(h.session.is_authenticated());
}

#[tokio::test]
async fn undecodable_success_body_is_decode_error() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);
    backend.force(Method::GET, "/shops", StatusCode::OK, json!({ "not": "a list" }));

    let err = h.client.shops().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// =============================================================================
// URL building
// =============================================================================

#[tokio::test]
async fn ids_are_encoded_as_one_segment() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);

    let err = h.client.users().get("../shops").await.unwrap_err();

    assert!(matches!(err, ApiError::Backend { status: 404, .. }));
    assert_eq!(backend.requests()[0].path, "/users/..%2Fshops");
}

#[test]
fn url_keeps_base_path_prefix() {
    let h = Harness::new("https://api.example.test/v1");
    let url = h.client.url(&["users", "streamers", "all"]).unwrap();
    assert_eq!(url.as_str(), "https://api.example.test/v1/users/streamers/all");

    let h = Harness::new("http://localhost:3001");
    assert_eq!(h.client.url(&["shops"]).unwrap().as_str(), "http://localhost:3001/shops");
}
