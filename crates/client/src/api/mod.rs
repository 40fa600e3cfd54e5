//! REST API client.
//!
//! Uses `reqwest` for HTTP and `moka` for short-lived product lookups
//! (5-minute TTL). Every request goes through [`ApiClient::execute`], which
//! plays the part of a response interceptor:
//!
//! - attaches `Authorization: Bearer <token>` when a token is held
//! - on 401, drops the token from memory and durable storage
//! - turns other non-2xx responses into [`ClientError::Api`] carrying the
//!   body's `detail`/`message` text
//! - turns "no response" into [`ClientError::Network`]
//!
//! Endpoint methods live in submodules grouped by resource.

mod admin;
mod auth;
mod cache;
mod orders;
mod products;
pub mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;
use wonderland_core::ValidationError;

use crate::config::ClientConfig;
use crate::error::{ClientError, GENERIC_API_MESSAGE, Result};
use crate::storage::TokenStorage;

use cache::{CacheKey, CacheValue};

/// Shown when a 401 arrives without a usable message.
const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

/// How much of an unexpected body to keep in logs.
const LOG_BODY_LIMIT: usize = 500;

/// Whether a request may carry the stored bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Attach the token if one is held; a 401 clears it.
    Bearer,
    /// Credential exchange (login, register). Sent without the token, and a
    /// 401 means "wrong credentials", not "stale session".
    Anonymous,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Wonderland REST API.
///
/// Cheap to clone; clones share the HTTP connection pool, the bearer token
/// and the lookup cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    storage: Arc<dyn TokenStorage>,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a client and load any token persisted by an earlier run.
    ///
    /// A token store that cannot be read is logged and treated as empty.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("wonderland-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let token = storage.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read stored session token");
            None
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                token: RwLock::new(token),
                storage,
                cache,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether a bearer token is currently held.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.token.read().is_some()
    }

    /// Hold `token` for future requests and persist it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if persisting fails. The token is not
    /// held in that case either.
    pub(crate) fn set_token(&self, token: SecretString) -> Result<()> {
        self.inner.storage.save(&token)?;
        *self.inner.token.write() = Some(token);
        Ok(())
    }

    /// Drop the token from memory and durable storage.
    ///
    /// Never fails: a storage error is logged and the in-memory token is
    /// dropped regardless.
    pub(crate) fn clear_token(&self) {
        self.inner.token.write().take();
        if let Err(e) = self.inner.storage.clear() {
            tracing::warn!(error = %e, "Failed to clear stored session token");
        }
    }

    /// Drop every cached product lookup.
    pub(crate) fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// URL of `segments` below the base path.
    ///
    /// Each segment is percent-encoded on its own, so a `/`, `?` or `#`
    /// inside an id stays part of that id.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        if let Some(segment) = segments
            .iter()
            .find(|s| matches!(s.trim(), "" | "." | ".."))
        {
            return Err(ValidationError::InvalidId((*segment).to_string()).into());
        }

        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Decode(format!("base URL {} has no path", self.inner.base_url))
            })?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.inner.client.request(method, self.endpoint(segments)?))
    }

    /// Send a request and return the body of a success response.
    async fn execute(&self, builder: RequestBuilder, auth: Auth) -> Result<String> {
        let builder = match (auth, self.inner.token.read().as_ref()) {
            (Auth::Bearer, Some(token)) => builder.bearer_auth(token.expose_secret()),
            _ => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);

        if status == StatusCode::UNAUTHORIZED {
            if auth == Auth::Bearer {
                tracing::warn!(path = %url, "Session rejected by API, clearing token");
                self.clear_token();
            }
            return Err(ClientError::Auth(
                message.unwrap_or_else(|| SESSION_EXPIRED_MESSAGE.to_string()),
            ));
        }

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                path = %url,
                body = %truncate(&body),
                "API returned server error"
            );
        } else {
            tracing::debug!(status = %status, path = %url, "API returned client error");
        }

        Err(ClientError::Api {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| GENERIC_API_MESSAGE.to_string()),
        })
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        auth: Auth,
    ) -> Result<T> {
        let body = self.execute(builder, auth).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body),
                "Failed to parse API response"
            );
            ClientError::Decode(e.to_string())
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T> {
        let builder = self.request(Method::GET, segments)?.query(query);
        self.execute_json(builder, Auth::Bearer).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        auth: Auth,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, segments)?.json(body);
        self.execute_json(builder, auth).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("has_token", &self.has_token())
            .finish_non_exhaustive()
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
