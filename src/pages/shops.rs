//! Shops page: activation and deletion.
//!
//! Activating a shop also makes its owner a streamer, and deactivating it
//! reverts the owner. The backend exposes no combined endpoint, so this is
//! two requests: the shop first, then the owner. When the second one fails
//! the shop change stands, the page shows the confirmed shop state, and the
//! error names the owner update that did not happen.

use super::{ActionError, ListPage};
use crate::api::ApiClient;
use crate::filter::ShopStatusFilter;
use crate::models::{Shop, ShopPatch, UserPatch};

#[cfg(test)]
#[path = "shops_test.rs"]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopStats {
    pub active: usize,
    pub inactive: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ShopsPage {
    pub list: ListPage<Shop, ShopStatusFilter>,
}

impl ShopsPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch `GET /shops` into the page.
    pub async fn load(&mut self, api: &ApiClient) {
        let ticket = self.list.begin_load();
        let result = api.shops().list().await;
        self.list.finish_load(ticket, result);
    }

    #[must_use]
    pub fn stats(&self) -> ShopStats {
        ShopStats {
            active: self.list.count(|s| s.is_active),
            inactive: self.list.count(|s| !s.is_active),
        }
    }

    /// # Errors
    ///
    /// See [`ShopsPage::set_active`].
    pub async fn activate(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.set_active(api, id, true).await
    }

    /// # Errors
    ///
    /// See [`ShopsPage::set_active`].
    pub async fn deactivate(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.set_active(api, id, false).await
    }

    /// Set the shop's `isActive` and then its owner's `isStreamer` to
    /// `active`. The detail view closes only when both succeed.
    ///
    /// # Errors
    ///
    /// [`ActionError::MissingOwner`] before any request when the shop has
    /// no owner, [`ActionError::Api`] when the shop update fails (nothing
    /// changed), and [`ActionError::OwnerUpdateFailed`] when only the owner
    /// update fails.
    pub async fn set_active(&mut self, api: &ApiClient, id: &str, active: bool) -> Result<(), ActionError> {
        let owner_id = match self.list.require(id)?.owner.as_deref() {
            Some(owner) => owner.id.clone(),
            None => return Err(self.list.fail(ActionError::MissingOwner)),
        };

        self.list.begin_update();
        let saved = match api.shops().update(id, &ShopPatch::activation(active)).await {
            Ok(saved) => saved,
            Err(e) => return Err(self.list.fail(e.into())),
        };
        self.list.confirm(id, |shop| shop.is_active = saved.is_active);
        tracing::info!(shop = id, active = saved.is_active, "shop activation changed");

        self.list.begin_update();
        match api.users().update(&owner_id, &UserPatch::streamer_flag(active)).await {
            Ok(owner) => {
                self.list.confirm(id, |shop| {
                    if let Some(local) = shop.owner.as_deref_mut() {
                        local.is_streamer = owner.is_streamer;
                    }
                });
                self.list.close();
                Ok(())
            }
            Err(source) => Err(self.list.fail(ActionError::OwnerUpdateFailed { shop_id: id.to_string(), source })),
        }
    }

    /// Delete `id` and drop it from the page.
    ///
    /// # Errors
    ///
    /// Unknown id or backend failure; the row stays on failure.
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> Result<(), ActionError> {
        self.list.require(id)?;
        self.list.begin_update();
        match api.shops().delete(id).await {
            Ok(()) => {
                tracing::info!(shop = id, "shop deleted");
                self.list.confirm_removed(id);
                Ok(())
            }
            Err(e) => Err(self.list.fail(e.into())),
        }
    }
}
