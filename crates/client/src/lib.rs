//! Wonderland Toy Store client library.
//!
//! Talks to the store's REST backend and keeps the client-side state a
//! storefront needs between requests.
//!
//! # Architecture
//!
//! - [`api::ApiClient`] owns the HTTP client and the bearer token. Every
//!   request goes through one place that attaches the token, clears it on
//!   a 401 and turns non-2xx bodies into [`ClientError`]s.
//! - [`storage`] persists the bearer token across restarts.
//! - [`stores`] holds the state containers. Each store is an owned value
//!   built with an injected `ApiClient`; none of them reach for globals.
//! - [`state::Storefront`] bundles a client and its stores for front ends.
//!
//! # Example
//!
//! ```rust,ignore
//! use wonderland_client::{ClientConfig, Storefront};
//!
//! let config = ClientConfig::from_env()?;
//! let mut shop = Storefront::open(&config)?;
//! shop.auth.refresh_session().await?;
//!
//! shop.products.fetch_all().await?;
//! let robots = shop.products.search("robot");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod state;
pub mod storage;
pub mod stores;

pub use api::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, Result};
pub use state::Storefront;
