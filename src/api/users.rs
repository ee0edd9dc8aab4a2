//! `/users` gateway.

use super::{ApiClient, ApiError};
use crate::models::{User, UserPatch};

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /users`
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json(&["users"]).await
    }

    /// `GET /users/streamers/all`
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn list_streamers(&self) -> Result<Vec<User>, ApiError> {
        self.client.get_json(&["users", "streamers", "all"]).await
    }

    /// `GET /users/{id}`
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        self.client.get_json(&["users", id]).await
    }

    /// `PATCH /users/{id}` with only the fields set in `patch`. Returns the
    /// record as the backend stored it.
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn update(&self, id: &str, patch: &UserPatch) -> Result<User, ApiError> {
        self.client.patch_json(&["users", id], patch).await
    }

    /// `DELETE /users/{id}`
    ///
    /// # Errors
    ///
    /// Transport or backend failure.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&["users", id]).await
    }
}
