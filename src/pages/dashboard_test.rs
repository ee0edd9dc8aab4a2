use axum::http::{Method, StatusCode};
use serde_json::json;

use super::*;
use crate::testing::{FakeBackend, Harness};

#[tokio::test]
async fn load_counts_everything() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);
    let mut page = DashboardPage::new();
    assert!(page.is_loading());

    let stats = page.load(&h.client).await.unwrap();

    assert_eq!(
        stats,
        DashboardStats {
            total_users: 4,
            total_streamers: 2,
            verified_streamers: 1,
            pending_streamers: 1,
            total_shops: 2,
            active_shops: 1,
        }
    );
    assert_eq!(page.stats(), stats);
    assert!(!page.is_loading());

    let mut paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    paths.sort();
    assert_eq!(paths, vec!["/shops", "/users", "/users/streamers/all"]);
}

#[tokio::test]
async fn any_failing_request_fails_the_load() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);
    let mut page = DashboardPage::new();
    page.load(&h.client).await.unwrap();

    backend.force(Method::GET, "/shops", StatusCode::BAD_GATEWAY, json!({ "message": "upstream" }));
    let err = page.load(&h.client).await.unwrap_err();

    assert_eq!(err.status(), Some(502));
    assert_eq!(page.error(), Some("upstream"));
    // Previous counts stay on screen.
    assert_eq!(page.stats().total_users, 4);
}

#[test]
fn pending_is_total_minus_verified() {
    let streamer = |verified: bool| -> User {
        serde_json::from_value(json!({ "id": "x", "email": "x@example.com", "isStreamer": true, "is_verified": verified }))
            .unwrap()
    };
    let streamers = vec![streamer(true), streamer(false), streamer(false), streamer(true), streamer(false)];

    let stats = DashboardStats::compute(&[], &streamers, &[]);

    assert_eq!(stats.total_streamers, 5);
    assert_eq!(stats.verified_streamers, 2);
    assert_eq!(stats.pending_streamers, 3);
    assert_eq!(stats.total_users, 0);
}
