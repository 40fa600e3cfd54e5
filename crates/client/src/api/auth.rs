//! Authentication and profile endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{ApiClient, Auth, AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest, User};
use crate::error::Result;

impl ApiClient {
    /// Exchange credentials for a token (`POST /auth/login/json`).
    ///
    /// Does not touch the held token; the caller decides whether to keep
    /// the returned one.
    ///
    /// # Errors
    ///
    /// `ClientError::Auth` for wrong credentials, otherwise as for any request.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        self.send_json(Method::POST, &["auth", "login", "json"], &body, Auth::Anonymous)
            .await
    }

    /// Create an account and receive a token (`POST /auth/register`).
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with the backend's message, e.g. an email that is
    /// already registered.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &SecretString,
    ) -> Result<AuthResponse> {
        let body = RegisterRequest {
            email,
            name,
            password: password.expose_secret(),
        };
        self.send_json(Method::POST, &["auth", "register"], &body, Auth::Anonymous)
            .await
    }

    /// The user the held token belongs to (`GET /auth/me`).
    ///
    /// # Errors
    ///
    /// `ClientError::Auth` if the token is missing, expired or revoked.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User> {
        self.get_json(&["auth", "me"], &[]).await
    }

    /// Like [`ApiClient::me`], but authenticated with `token` instead of the
    /// held one. A rejection leaves the held token alone.
    pub(crate) async fn me_with(&self, token: &SecretString) -> Result<User> {
        let builder = self
            .request(Method::GET, &["auth", "me"])?
            .bearer_auth(token.expose_secret());
        self.execute_json(builder, Auth::Anonymous).await
    }

    /// Update the current user's name and/or email (`PUT /users/profile`).
    ///
    /// # Errors
    ///
    /// `ClientError::Api` if the backend rejects the change.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        self.send_json(Method::PUT, &["users", "profile"], update, Auth::Bearer)
            .await
    }
}
