use axum::http::Method;

use crate::models::ShopPatch;
use crate::testing::{FakeBackend, Harness};

#[tokio::test]
async fn list_and_get() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);

    let shops = h.client.shops().list().await.unwrap();
    assert_eq!(shops.len(), 2);

    let shop = h.client.shops().get("s2").await.unwrap();
    assert!(shop.is_active);
    assert_eq!(shop.owner.unwrap().id, "u2");
}

#[tokio::test]
async fn update_sends_only_patched_field() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);

    let shop = h.client.shops().update("s1", &ShopPatch::activation(true)).await.unwrap();

    assert!(shop.is_active);
    assert_eq!(shop.name.as_deref(), Some("Looms"));
    let req = backend.requests().into_iter().find(|r| r.method == Method::PATCH).unwrap();
    assert_eq!(req.path, "/shops/s1");
    assert_eq!(req.body.unwrap(), serde_json::json!({ "isActive": true }));
}

#[tokio::test]
async fn delete_missing_shop_is_backend_404() {
    let backend = FakeBackend::seeded();
    let h = Harness::logged_in(&backend.spawn().await);

    let err = h.client.shops().delete("nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Not found");

    h.client.shops().delete("s1").await.unwrap();
    assert!(backend.shop("s1").is_none());
}
