//! `/shops` gateway.

use super::{ApiClient, ApiError};
use crate::models::{Shop, ShopPatch};

#[cfg(test)]
#[path = "shops_test.rs"]
mod tests;

pub struct ShopsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ShopsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /shops`
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn list(&self) -> Result<Vec<Shop>, ApiError> {
        self.client.get_json(&["shops"]).await
    }

    /// `GET /shops/{id}`
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn get(&self, id: &str) -> Result<Shop, ApiError> {
        self.client.get_json(&["shops", id]).await
    }

    /// `PATCH /shops/{id}`
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn update(&self, id: &str, patch: &ShopPatch) -> Result<Shop, ApiError> {
        self.client.patch_json(&["shops", id], patch).await
    }

    /// `DELETE /shops/{id}`
    ///
    /// # Errors
    ///
    /// Transport or backend failure.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&["shops", id]).await
    }
}
