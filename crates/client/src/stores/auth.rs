//! Authentication state.
//!
//! The bearer token itself lives in the [`ApiClient`] so every request can
//! use it. This store holds who the token belongs to and drives the
//! login, registration and logout flows.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};
use wonderland_core::validation::{RegistrationForm, validate_login};

use crate::api::{ApiClient, AuthResponse, ProfileUpdate, User};
use crate::error::{ClientError, Result};

/// Shown when an operation needs a signed-in user and there is none.
const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to continue";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    /// When this process established the session.
    pub since: DateTime<Utc>,
}

impl Session {
    fn new(user: User) -> Self {
        Self {
            user,
            since: Utc::now(),
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

/// Holds the current session.
#[derive(Debug)]
pub struct AuthStore {
    api: ApiClient,
    session: Option<Session>,
}

impl AuthStore {
    /// A store with no session. Call [`AuthStore::refresh_session`] to pick
    /// up a token saved by an earlier run.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api, session: None }
    }

    /// The current session.
    ///
    /// `None` as soon as any request has had its token rejected, even
    /// before [`AuthStore::logout`] is called.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|_| self.api.has_token())
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.session().is_some_and(Session::is_admin)
    }

    /// Sign in with email and password.
    ///
    /// On failure the previous session (and stored token) is kept.
    ///
    /// # Errors
    ///
    /// Validation errors before any request; `ClientError::Auth` carrying
    /// the backend's message for wrong credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &SecretString) -> Result<&Session> {
        let email = validate_login(email, password.expose_secret())?;
        let response = self.api.login(email.as_str(), password).await?;
        let session = self.establish(response).await?;
        info!(user_id = %session.user.id, role = %session.user.role, "Logged in");
        Ok(session)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Validation errors before any request; `ClientError::Api` with the
    /// backend's message (e.g. an email already in use).
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&mut self, form: &RegistrationForm<'_>) -> Result<&Session> {
        let email = form.validate()?;
        let password = SecretString::from(form.password);
        let response = self
            .api
            .register(email.as_str(), form.name.trim(), &password)
            .await?;
        let session = self.establish(response).await?;
        info!(user_id = %session.user.id, "Registered");
        Ok(session)
    }

    /// Forget the session and the stored token. Never fails.
    pub fn logout(&mut self) {
        self.session = None;
        self.api.clear_token();
        info!("Logged out");
    }

    /// Revalidate a stored token against `GET /auth/me`.
    ///
    /// Returns whether a session is now established. A missing, expired or
    /// revoked token is "logged out", not an error.
    ///
    /// # Errors
    ///
    /// Network and server failures. The stored token is kept in that case
    /// (the user may just be offline) but no session is established.
    #[instrument(skip(self))]
    pub async fn refresh_session(&mut self) -> Result<bool> {
        if !self.api.has_token() {
            self.session = None;
            return Ok(false);
        }

        match self.api.me().await {
            Ok(user) => {
                info!(user_id = %user.id, "Session restored");
                self.session = Some(Session::new(user));
                Ok(true)
            }
            Err(e) if e.is_auth() => {
                // The 401 already cleared the token.
                self.session = None;
                Ok(false)
            }
            Err(e) => {
                warn!(error = %e, "Could not revalidate session");
                self.session = None;
                Err(e)
            }
        }
    }

    /// Change the signed-in user's name and/or email.
    ///
    /// # Errors
    ///
    /// `ClientError::Auth` without a session, validation errors before any
    /// request, otherwise the backend's rejection.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&mut self, update: ProfileUpdate) -> Result<&User> {
        if !self.is_authenticated() {
            return Err(ClientError::Auth(LOGIN_REQUIRED_MESSAGE.to_string()));
        }
        let update = update.validated()?;
        let user = self.api.update_profile(&update).await?;
        let session = self.session.insert(Session::new(user));
        Ok(&session.user)
    }

    /// Adopt a freshly issued token. Nothing changes unless every step
    /// succeeds.
    async fn establish(&mut self, response: AuthResponse) -> Result<&Session> {
        let token = SecretString::from(response.access_token);
        let user = match response.user {
            Some(user) => user,
            None => self.api.me_with(&token).await?,
        };
        self.api.set_token(token)?;
        Ok(self.session.insert(Session::new(user)))
    }
}
