//! REST client for the platform backend.
//!
//! ARCHITECTURE
//! ============
//! One `reqwest::Client` bound to the configured base URL. Every request
//! passes through two hooks:
//!
//! - outgoing: attach `Authorization: Bearer <token>` when the session store
//!   holds a session;
//! - incoming: a 401 on a session-scoped request clears the session and asks
//!   the [`Navigator`] for the login route before the error is returned.
//!
//! The resource gateways (`users`, `shops`, `auth`) are thin: one call per
//! operation plus JSON decoding. Nothing here retries or caches.

pub mod auth;
pub mod error;
pub mod shops;
pub mod users;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::ApiError;

use crate::config::Config;
use crate::routes::{Navigator, Route};
use crate::session::SessionStore;

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

/// Whether a request runs under the admin session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    /// Bearer attached when present; 401 ends the session.
    Session,
    /// No bearer; 401 is returned as-is. Used by the login call.
    Public,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build the shared client from config.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// fails to build.
    pub fn new(config: &Config, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(&config.api_base_url).map_err(|_| ApiError::InvalidBaseUrl(config.api_base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.api_base_url.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url, session, navigator })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn users(&self) -> users::UsersApi<'_> {
        users::UsersApi::new(self)
    }

    #[must_use]
    pub fn shops(&self) -> shops::ShopsApi<'_> {
        shops::ShopsApi::new(self)
    }

    #[must_use]
    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let request = self.request(Method::GET, segments, Access::Session)?;
        let response = self.execute(request, Access::Session).await?;
        decode(response).await
    }

    pub(crate) async fn patch_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PATCH, segments, Access::Session)?.json(body);
        let response = self.execute(request, Access::Session).await?;
        decode(response).await
    }

    pub(crate) async fn post_json<B, T>(&self, segments: &[&str], body: &B, access: Access) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, segments, access)?.json(body);
        let response = self.execute(request, access).await?;
        decode(response).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, segments, Access::Session)?;
        self.execute(request, Access::Session).await?;
        Ok(())
    }

    /// Resolve `segments` under the base URL. Each segment is
    /// percent-encoded, so ids cannot escape their path position.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Outgoing hook.
    fn request(&self, method: Method, segments: &[&str], access: Access) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.url(segments)?;
        tracing::debug!(%method, path = url.path(), "api request");
        let mut request = self.http.request(method, url);
        if access == Access::Session {
            if let Some(token) = self.session.token() {
                match HeaderValue::from_str(&format!("Bearer {token}")) {
                    Ok(mut value) => {
                        value.set_sensitive(true);
                        request = request.header(AUTHORIZATION, value);
                    }
                    Err(_) => tracing::warn!("session token is not a valid header value; sending unauthenticated"),
                }
            }
        }
        Ok(request)
    }

    /// Send and run the incoming hook.
    async fn execute(&self, request: reqwest::RequestBuilder, access: Access) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), path = response.url().path(), "api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error::extract_message(&body);

        if status == StatusCode::UNAUTHORIZED {
            if access == Access::Session {
                tracing::warn!("session rejected by backend; returning to login");
                self.session.clear();
                self.navigator.navigate(Route::Login);
            }
            return Err(ApiError::Unauthorized { message });
        }

        Err(ApiError::Backend { status: status.as_u16(), message })
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
