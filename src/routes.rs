//! Console routes and the authentication guard.
//!
//! Every page except `/login` needs a session. The guard is a pure function
//! of the route and the session store; navigation side effects go through
//! the [`Navigator`] callback so the REST client can trigger a redirect
//! without owning any UI.

use std::sync::Mutex;

use crate::session::SessionStore;

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Dashboard,
    Users,
    Streamers,
    Shops,
}

impl Route {
    pub const ALL: [Route; 6] =
        [Route::Root, Route::Login, Route::Dashboard, Route::Users, Route::Streamers, Route::Shops];

    /// Match a path; a single trailing slash is ignored.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = if path.len() > 1 { path.strip_suffix('/').unwrap_or(path) } else { path };
        Self::ALL.into_iter().find(|route| route.path() == trimmed)
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Users => "/users",
            Self::Streamers => "/streamers",
            Self::Shops => "/shops",
        }
    }

    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard | Self::Users | Self::Streamers | Self::Shops)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of running a route through [`guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

/// Gate `route` on the session's authenticated flag.
#[must_use]
pub fn guard(route: Route, session: &SessionStore) -> RouteDecision {
    let authenticated = session.is_authenticated();
    match route {
        Route::Root if authenticated => RouteDecision::Redirect(Route::Dashboard),
        Route::Root => RouteDecision::Redirect(Route::Login),
        r if r.requires_auth() && !authenticated => RouteDecision::Redirect(Route::Login),
        r => RouteDecision::Render(r),
    }
}

/// Navigation callback. The REST client calls it on authentication
/// rejection; tests substitute a recorder.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only records requested routes, in order.
#[derive(Debug, Default)]
pub struct NavigationLog {
    requested: Mutex<Vec<Route>>,
}

impl NavigationLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn requested(&self) -> Vec<Route> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.requested.lock().ok().and_then(|r| r.last().copied())
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, route: Route) {
        tracing::debug!(%route, "navigation requested");
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(route);
        }
    }
}
