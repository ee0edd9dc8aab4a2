//! Dashboard: platform-wide counts.

use crate::api::{ApiClient, ApiError};
use crate::models::{Shop, User};

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_streamers: usize,
    pub verified_streamers: usize,
    pub pending_streamers: usize,
    pub total_shops: usize,
    pub active_shops: usize,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(users: &[User], streamers: &[User], shops: &[Shop]) -> Self {
        let verified = streamers.iter().filter(|s| s.is_verified).count();
        Self {
            total_users: users.len(),
            total_streamers: streamers.len(),
            verified_streamers: verified,
            pending_streamers: streamers.len() - verified,
            total_shops: shops.len(),
            active_shops: shops.iter().filter(|s| s.is_active).count(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardPage {
    stats: DashboardStats,
    loading: bool,
    error: Option<String>,
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardPage {
    #[must_use]
    pub fn new() -> Self {
        Self { stats: DashboardStats::default(), loading: true, error: None }
    }

    /// Fetch users, streamers and shops concurrently and recompute the
    /// counts. On failure the previous counts stay and the error is kept.
    ///
    /// # Errors
    ///
    /// The first failing request's error.
    pub async fn load(&mut self, api: &ApiClient) -> Result<DashboardStats, ApiError> {
        self.loading = true;
        let users = api.users();
        let shops = api.shops();
        let fetched = tokio::try_join!(users.list(), users.list_streamers(), shops.list());
        self.loading = false;

        match fetched {
            Ok((users, streamers, shops)) => {
                self.stats = DashboardStats::compute(&users, &streamers, &shops);
                self.error = None;
                Ok(self.stats)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dashboard load failed");
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        self.stats
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
