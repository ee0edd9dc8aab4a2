//! Admin authentication gateway.

use super::{Access, ApiClient, ApiError};
use crate::models::{Credentials, LoginResponse};

/// Anything that can exchange admin credentials for a login payload.
///
/// Implemented by [`ApiClient`]; the session store only depends on this
/// trait so its login flow can run against a stub.
#[async_trait::async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login_admin(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
}

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /auth/admin/login`. Sent without a bearer; a 401 here means bad
    /// credentials and does not end any session.
    ///
    /// # Errors
    ///
    /// Transport, backend, or decode failure.
    pub async fn login_admin(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.client
            .post_json(&["auth", "admin", "login"], credentials, Access::Public)
            .await
    }
}

#[async_trait::async_trait]
impl AuthGateway for ApiClient {
    async fn login_admin(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.auth().login_admin(credentials).await
    }
}
