//! Catalog endpoints.

use reqwest::Method;
use tracing::{debug, instrument};
use wonderland_core::{Category, ProductId};

use super::cache::{CacheKey, CacheValue};
use super::{ApiClient, Auth, ProductDraft, ProductPatch, ProductRecord};
use crate::error::Result;

impl ApiClient {
    // =========================================================================
    // Reads
    // =========================================================================

    /// The catalog, optionally narrowed to one category (`GET /products`).
    ///
    /// Never cached here; the product store owns catalog freshness.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<Category>) -> Result<Vec<ProductRecord>> {
        match category {
            Some(category) => {
                self.get_json(&["products"], &[("category", category.as_str())])
                    .await
            }
            None => self.get_json(&["products"], &[]).await,
        }
    }

    /// One product (`GET /products/:id`).
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<ProductRecord> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: ProductRecord = self
            .get_json(&["products", id.as_str()], &[])
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Server-side search over name, brand and description
    /// (`GET /products/search?q=`).
    ///
    /// A blank query returns the whole catalog, since the backend refuses
    /// an empty `q`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<ProductRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return self.list_products(None).await;
        }

        let cache_key = CacheKey::Search(query.to_lowercase());
        if let Some(CacheValue::Search(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for search");
            return Ok(products);
        }

        let products: Vec<ProductRecord> =
            self.get_json(&["products", "search"], &[("q", query)]).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Search(products.clone()))
            .await;

        Ok(products)
    }

    // =========================================================================
    // Admin writes
    // =========================================================================

    /// Create a product (`POST /products`, admin only).
    ///
    /// # Errors
    ///
    /// Validation errors before sending; `ClientError::Api` with status 403
    /// for non-admin sessions.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<ProductRecord> {
        draft.validate()?;
        let created: ProductRecord = self
            .send_json(Method::POST, &["products"], draft, Auth::Bearer)
            .await?;
        self.invalidate_cache();
        Ok(created)
    }

    /// Apply a partial update (`PUT /products/:id`, admin only).
    ///
    /// # Errors
    ///
    /// Validation errors before sending; `ClientError::Api` with status 404
    /// if the product does not exist.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<ProductRecord> {
        patch.validate()?;
        let updated: ProductRecord = self
            .send_json(
                Method::PUT,
                &["products", id.as_str()],
                patch,
                Auth::Bearer,
            )
            .await?;
        self.invalidate_cache();
        Ok(updated)
    }

    /// Delete a product (`DELETE /products/:id`, admin only).
    ///
    /// Any response body (some backend builds send a confirmation message,
    /// others 204) is ignored.
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        let builder = self.request(Method::DELETE, &["products", id.as_str()])?;
        self.execute(builder, Auth::Bearer).await?;
        self.invalidate_cache();
        Ok(())
    }
}
