//! Session store: the authenticated admin's token and profile.
//!
//! DESIGN
//! ======
//! The store is the single writer of session state and the only component
//! that touches persisted storage. It is shared as `Arc<SessionStore>` with
//! the REST client (reads the token, clears on 401) and the route guard
//! (reads the authenticated flag).
//!
//! Every transition updates persisted storage and memory while holding the
//! write lock, so readers never observe one side without the other. The
//! token and profile live together in `Option<Session>`: there is no state
//! with one and not the other.

pub mod storage;

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::ApiError;
use crate::api::auth::AuthGateway;
use crate::models::{AdminProfile, Credentials};
use storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: AdminProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The backend answered 2xx without both a token and a user.
    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to persist session: {0}")]
    Storage(#[from] StorageError),
}

impl LoginError {
    /// Message for the login form: the backend's own message when it sent
    /// one, otherwise this error's text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(api) => api.user_message(),
            other => other.to_string(),
        }
    }
}

pub struct SessionStore {
    current: RwLock<Option<Session>>,
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Load a previously persisted session from `storage`.
    ///
    /// A missing key, an empty token or an unparsable profile discards both
    /// keys and yields an unauthenticated store. Never fails.
    pub fn restore(storage: impl SessionStorage + 'static) -> Self {
        let storage: Box<dyn SessionStorage> = Box::new(storage);
        let current = load_persisted(storage.as_ref());
        match &current {
            Some(session) => tracing::info!(user = %session.user.email, "session restored"),
            None => {
                purge(storage.as_ref());
                tracing::debug!("no persisted session");
            }
        }
        Self { current: RwLock::new(current), storage }
    }

    /// Exchange credentials for a session through `auth`.
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidResponse`] when the backend omits the
    /// token or the user, [`LoginError::Api`] for transport and backend
    /// failures, and [`LoginError::Storage`] when the session cannot be
    /// persisted. Every failure leaves the store (memory and storage) empty.
    pub async fn login<A>(&self, auth: &A, credentials: &Credentials) -> Result<Session, LoginError>
    where
        A: AuthGateway + ?Sized,
    {
        let outcome = match auth.login_admin(credentials).await {
            Ok(response) => match (response.access_token, response.user) {
                (Some(token), Some(user)) if !token.is_empty() => {
                    self.establish(Session { token, user })
                }
                _ => Err(LoginError::InvalidResponse),
            },
            Err(e) => Err(LoginError::Api(e)),
        };

        match outcome {
            Ok(session) => {
                tracing::info!(user = %session.user.email, "admin logged in");
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "admin login failed");
                self.clear();
                Err(e)
            }
        }
    }

    /// Drop the session. No network call.
    pub fn logout(&self) {
        if self.clear() {
            tracing::info!("admin logged out");
        }
    }

    /// Remove the session from memory and storage. Returns whether one was
    /// present. Storage failures are logged; memory is cleared regardless.
    pub fn clear(&self) -> bool {
        let mut current = self.write();
        purge(self.storage.as_ref());
        current.take().is_some()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    #[must_use]
    pub fn user(&self) -> Option<AdminProfile> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    fn establish(&self, session: Session) -> Result<Session, LoginError> {
        let user_json = serde_json::to_string(&session.user).map_err(ApiError::Decode)?;
        let mut current = self.write();
        let written = self
            .storage
            .set(TOKEN_KEY, &session.token)
            .and_then(|()| self.storage.set(USER_KEY, &user_json));
        if let Err(e) = written {
            // Never leave one key persisted without the other.
            purge(self.storage.as_ref());
            *current = None;
            return Err(e.into());
        }
        *current = Some(session.clone());
        Ok(session)
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_persisted(storage: &dyn SessionStorage) -> Option<Session> {
    let read = |key: &str| match storage.get(key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "session storage read failed");
            None
        }
    };
    let token = read(TOKEN_KEY).filter(|t| !t.trim().is_empty())?;
    let raw_user = read(USER_KEY)?;
    match serde_json::from_str::<AdminProfile>(&raw_user) {
        Ok(user) => Some(Session { token: token.trim().to_string(), user }),
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed persisted session");
            None
        }
    }
}

fn purge(storage: &dyn SessionStorage) {
    for key in [TOKEN_KEY, USER_KEY] {
        if let Err(e) = storage.remove(key) {
            tracing::warn!(key, error = %e, "failed to remove persisted session key");
        }
    }
}
