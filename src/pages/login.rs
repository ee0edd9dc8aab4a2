//! Login form state.

use crate::api::auth::AuthGateway;
use crate::models::Credentials;
use crate::routes::Route;
use crate::session::{LoginError, SessionStore};

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;

pub const LOGIN_FALLBACK: &str = "Invalid credentials. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    submitting: bool,
    error: Option<String>,
}

impl LoginForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submit the form. On success the password is cleared and the route
    /// to go to next is returned.
    ///
    /// # Errors
    ///
    /// [`LoginError::MissingCredentials`] without a request when either
    /// field is blank, otherwise whatever [`SessionStore::login`] returns.
    /// The form keeps a message for display in every case.
    pub async fn submit<A>(&mut self, session: &SessionStore, auth: &A) -> Result<Route, LoginError>
    where
        A: AuthGateway + ?Sized,
    {
        self.error = None;
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            let err = LoginError::MissingCredentials;
            self.error = Some(err.to_string());
            return Err(err);
        }

        self.submitting = true;
        let credentials = Credentials::new(email, self.password.clone());
        let result = session.login(auth, &credentials).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.password.clear();
                Ok(Route::Dashboard)
            }
            Err(e) => {
                let message = e.user_message();
                self.error = Some(if message.trim().is_empty() { LOGIN_FALLBACK.to_string() } else { message });
                Err(e)
            }
        }
    }
}
