//! A client and its stores, wired together for a front end.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::storage::{FileTokenStorage, TokenStorage};
use crate::stores::{AuthStore, CartStore, OrderStore, ProductStore};

/// Everything a storefront session needs.
///
/// The stores are independent; they share only the `api` handle. Front ends
/// own this value and pass the stores around explicitly.
#[derive(Debug)]
pub struct Storefront {
    pub api: ApiClient,
    pub auth: AuthStore,
    pub cart: CartStore,
    pub products: ProductStore,
    pub orders: OrderStore,
}

impl Storefront {
    /// Open a storefront with the token persisted under the data directory.
    ///
    /// The cart starts empty; callers that keep a cart between runs load it
    /// themselves.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn open(config: &ClientConfig) -> Result<Self> {
        let storage = Arc::new(FileTokenStorage::new(config.session_file()));
        Self::with_storage(config, storage)
    }

    /// Open a storefront with an explicit token store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(config: &ClientConfig, storage: Arc<dyn TokenStorage>) -> Result<Self> {
        let api = ApiClient::new(config, storage)?;
        Ok(Self {
            auth: AuthStore::new(api.clone()),
            cart: CartStore::new(),
            products: ProductStore::new(api.clone(), config.product_ttl),
            orders: OrderStore::new(api.clone()),
            api,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_stores_share_the_token() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api", dir.path()).unwrap();
        let shop = Storefront::open(&config).unwrap();
        assert!(!shop.api.has_token());

        shop.api.set_token(SecretString::from("tok")).unwrap();
        assert!(config.session_file().exists());

        // A second storefront over the same data dir picks the token up
        let reopened = Storefront::open(&config).unwrap();
        assert!(reopened.api.has_token());
    }
}
