//! Users page: every account, with role changes and deletion.

use super::{ActionError, Control, ListPage};
use crate::api::ApiClient;
use crate::filter::RoleFilter;
use crate::models::{ROLE_STREAMER, ROLE_USER, User, UserPatch};

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

pub const PROMOTION_BLOCKED: &str = "User must have a shop pending activation";

/// A user can become a streamer only while their shop awaits activation.
#[must_use]
pub fn can_become_streamer(user: &User) -> bool {
    user.shop.as_ref().is_some_and(|shop| !shop.is_active)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub streamers: usize,
    pub regular: usize,
    pub verified: usize,
}

#[derive(Debug, Clone, Default)]
pub struct UsersPage {
    pub list: ListPage<User, RoleFilter>,
}

impl UsersPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `GET /users` into the page.
    pub async fn load(&mut self, api: &ApiClient) {
        let ticket = self.list.begin_load();
        let result = api.users().list().await;
        self.list.finish_load(ticket, result);
    }

    #[must_use]
    pub fn stats(&self) -> UserStats {
        UserStats {
            streamers: self.list.count(|u| u.is_streamer),
            regular: self.list.count(|u| !u.is_streamer),
            verified: self.list.count(|u| u.is_verified),
        }
    }

    /// State of the "Make Streamer" control for `user`.
    #[must_use]
    pub fn promotion_control(&self, user: &User) -> Control {
        if !can_become_streamer(user) {
            Control::Disabled { reason: PROMOTION_BLOCKED }
        } else if self.list.is_updating() {
            Control::Disabled { reason: "An update is in progress" }
        } else {
            Control::Enabled
        }
    }

    /// Promote `id` to streamer. Refused locally, with no request sent,
    /// unless the user's shop is pending activation.
    ///
    /// # Errors
    ///
    /// [`ActionError::PromotionNotAllowed`] when the rule fails, otherwise
    /// whatever the backend call returns.
    pub async fn make_streamer(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        if !can_become_streamer(self.list.require(id)?) {
            return Err(self.list.fail(ActionError::PromotionNotAllowed));
        }
        self.change_role(api, id, ROLE_STREAMER, true).await
    }

    /// Demote `id` to a regular user.
    ///
    /// # Errors
    ///
    /// Unknown id or backend failure.
    pub async fn make_regular(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.list.require(id)?;
        self.change_role(api, id, ROLE_USER, false).await
    }

    /// Delete `id` and drop it from the page.
    ///
    /// # Errors
    ///
    /// Unknown id or backend failure; the row stays on failure.
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.list.require(id)?;
        self.list.begin_update();
        match api.users().delete(id).await {
            Ok(()) => {
                tracing::info!(user = id, "user deleted");
                self.list.confirm_removed(id);
                Ok(())
            }
            Err(e) => Err(self.list.fail(e.into())),
        }
    }

    async fn change_role(&mut self, api: &ApiClient, id: &str, role: &str, streamer: bool) -> Result<(), ActionError> {
        self.list.begin_update();
        match api.users().update(id, &UserPatch::role(role, streamer)).await {
            Ok(saved) => {
                tracing::info!(user = id, role, "user role changed");
                self.list.confirm(id, |user| {
                    user.role = saved.role;
                    user.is_streamer = saved.is_streamer;
                });
                self.list.close();
                Ok(())
            }
            Err(e) => Err(self.list.fail(e.into())),
        }
    }
}
