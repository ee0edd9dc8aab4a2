//! Streamers page: verification review.

use super::{ActionError, ListPage};
use crate::api::ApiClient;
use crate::filter::VerificationFilter;
use crate::models::{User, UserPatch};

#[cfg(test)]
#[path = "streamers_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamerStats {
    pub total: usize,
    pub verified: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StreamersPage {
    pub list: ListPage<User, VerificationFilter>,
}

impl StreamersPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `GET /users/streamers/all` into the page.
    pub async fn load(&mut self, api: &ApiClient) {
        let ticket = self.list.begin_load();
        let result = api.users().list_streamers().await;
        self.list.finish_load(ticket, result);
    }

    #[must_use]
    pub fn stats(&self) -> StreamerStats {
        StreamerStats {
            total: self.list.items().len(),
            verified: self.list.count(|u| u.is_verified),
            pending: self.list.count(|u| !u.is_verified),
        }
    }

    /// # Errors
    ///
    /// Unknown id or backend failure.
    pub async fn verify(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.set_verified(api, id, true).await
    }

    /// # Errors
    ///
    /// Unknown id or backend failure.
    pub async fn reject(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.set_verified(api, id, false).await
    }

    async fn set_verified(&mut self, api: &ApiClient, id: &str, verified: bool) -> Result<(), ActionError> {
        self.list.require(id)?;
        self.list.begin_update();
        match api.users().update(id, &UserPatch::verification(verified)).await {
            Ok(saved) => {
                tracing::info!(streamer = id, verified = saved.is_verified, "streamer verification changed");
                self.list.confirm(id, |user| user.is_verified = saved.is_verified);
                self.list.close();
                Ok(())
            }
            Err(e) => Err(self.list.fail(e.into())),
        }
    }
}
