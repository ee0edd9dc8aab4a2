use super::*;
use crate::session::storage::{MemoryStorage, TOKEN_KEY, USER_KEY};
use crate::testing::admin_profile;

fn anonymous() -> SessionStore {
    SessionStore::restore(MemoryStorage::new())
}

fn signed_in() -> SessionStore {
    let user = serde_json::to_string(&admin_profile()).unwrap();
    SessionStore::restore(MemoryStorage::new().with(TOKEN_KEY, "tok").with(USER_KEY, &user))
}

#[test]
fn parse_matches_known_paths() {
    for route in Route::ALL {
        assert_eq!(Route::parse(route.path()), Some(route));
    }
    assert_eq!(Route::parse("/users/"), Some(Route::Users));
    assert_eq!(Route::parse("/"), Some(Route::Root));
    assert_eq!(Route::parse("/settings"), None);
    assert_eq!(Route::parse("users"), None);
}

#[test]
fn only_login_and_root_are_public() {
    let public: Vec<Route> = Route::ALL.into_iter().filter(|r| !r.requires_auth()).collect();
    assert_eq!(public, vec![Route::Root, Route::Login]);
}

#[test]
fn unauthenticated_protected_routes_redirect_to_login() {
    let session = anonymous();
    for route in [Route::Dashboard, Route::Users, Route::Streamers, Route::Shops] {
        assert_eq!(guard(route, &session), RouteDecision::Redirect(Route::Login), "{route}");
    }
    assert_eq!(guard(Route::Login, &session), RouteDecision::Render(Route::Login));
}

#[test]
fn authenticated_routes_render() {
    let session = signed_in();
    for route in [Route::Dashboard, Route::Users, Route::Streamers, Route::Shops, Route::Login] {
        assert_eq!(guard(route, &session), RouteDecision::Render(route));
    }
}

#[test]
fn root_forwards_by_session_state() {
    assert_eq!(guard(Route::Root, &anonymous()), RouteDecision::Redirect(Route::Login));
    assert_eq!(guard(Route::Root, &signed_in()), RouteDecision::Redirect(Route::Dashboard));
}

#[test]
fn guard_follows_logout() {
    let session = signed_in();
    assert_eq!(guard(Route::Shops, &session), RouteDecision::Render(Route::Shops));
    session.logout();
    assert_eq!(guard(Route::Shops, &session), RouteDecision::Redirect(Route::Login));
}

#[test]
fn navigation_log_records_in_order() {
    let log = NavigationLog::new();
    assert_eq!(log.last(), None);
    log.navigate(Route::Login);
    log.navigate(Route::Dashboard);
    assert_eq!(log.requested(), vec![Route::Login, Route::Dashboard]);
    assert_eq!(log.last(), Some(Route::Dashboard));
}
