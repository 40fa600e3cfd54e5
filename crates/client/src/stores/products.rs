//! Client-side product catalog.
//!
//! Holds the last catalog fetched from the API and answers filter and
//! search queries locally. A fetch inside the freshness window is served
//! from memory.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};
use wonderland_core::{Category, ProductId};

use super::catalog;
use crate::api::{ApiClient, ProductDraft, ProductPatch, ProductRecord};
use crate::error::{ClientError, Result};

/// Where the catalog is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    /// Never fetched.
    #[default]
    Idle,
    /// A fetch is in flight (or was abandoned mid-flight).
    Fetching,
    /// The last fetch succeeded.
    Populated,
    /// The last fetch failed; the message is fit for display.
    Error(String),
}

/// Cached catalog with admin write-through.
#[derive(Debug)]
pub struct ProductStore {
    api: ApiClient,
    records: Vec<ProductRecord>,
    state: FetchState,
    fetched_at: Option<Instant>,
    freshness: Duration,
}

impl ProductStore {
    #[must_use]
    pub const fn new(api: ApiClient, freshness: Duration) -> Self {
        Self {
            api,
            records: Vec::new(),
            state: FetchState::Idle,
            fetched_at: None,
            freshness,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &FetchState {
        &self.state
    }

    #[must_use]
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Whether a fetch now would be served from memory.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.state == FetchState::Populated
            && !self.records.is_empty()
            && self
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.freshness)
    }

    /// Load the catalog unless the cached copy is still fresh.
    ///
    /// # Errors
    ///
    /// Returns the request's error. The cached records are left as they
    /// were and the state becomes [`FetchState::Error`].
    #[instrument(skip(self))]
    pub async fn fetch_all(&mut self) -> Result<&[ProductRecord]> {
        if self.is_fresh() {
            debug!(count = self.records.len(), "Catalog still fresh");
            return Ok(&self.records);
        }
        self.load().await
    }

    /// Load the catalog regardless of freshness.
    ///
    /// # Errors
    ///
    /// Same as [`ProductStore::fetch_all`].
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<&[ProductRecord]> {
        self.load().await
    }

    async fn load(&mut self) -> Result<&[ProductRecord]> {
        self.state = FetchState::Fetching;
        match self.api.list_products(None).await {
            Ok(records) => {
                self.records = catalog::dedupe(records);
                self.fetched_at = Some(Instant::now());
                self.state = FetchState::Populated;
                info!(count = self.records.len(), "Catalog loaded");
                Ok(&self.records)
            }
            Err(e) => {
                warn!(error = %e, "Catalog fetch failed");
                self.state = FetchState::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetch one product from the API and merge it into the cache.
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with status 404 for an unknown id.
    pub async fn fetch_one(&mut self, id: &ProductId) -> Result<&ProductRecord> {
        let record = self.api.get_product(id).await?;
        Ok(self.upsert(record))
    }

    // =========================================================================
    // Local queries
    // =========================================================================

    #[must_use]
    pub fn get_by_id(&self, id: &ProductId) -> Option<&ProductRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// Like [`ProductStore::get_by_id`], for callers that need the record.
    ///
    /// # Errors
    ///
    /// `ClientError::NotFound` naming the id.
    pub fn require(&self, id: &ProductId) -> Result<&ProductRecord> {
        self.get_by_id(id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))
    }

    #[must_use]
    pub fn filter_by_category(&self, category: Category) -> Vec<&ProductRecord> {
        catalog::filter_by_category(&self.records, category)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&ProductRecord> {
        catalog::search(&self.records, query)
    }

    #[must_use]
    pub fn low_stock(&self, threshold: u32) -> Vec<&ProductRecord> {
        catalog::low_stock(&self.records, threshold)
    }

    // =========================================================================
    // Admin writes
    // =========================================================================

    /// Create a product and add it to the cache.
    ///
    /// # Errors
    ///
    /// Validation or API errors; the cache is unchanged on failure.
    pub async fn create(&mut self, draft: &ProductDraft) -> Result<&ProductRecord> {
        let created = self.api.create_product(draft).await?;
        info!(product_id = %created.id, "Product created");
        Ok(self.upsert(created))
    }

    /// Apply a partial update and replace the cached record.
    ///
    /// # Errors
    ///
    /// Validation or API errors; the cache is unchanged on failure.
    pub async fn update(&mut self, id: &ProductId, patch: &ProductPatch) -> Result<&ProductRecord> {
        let updated = self.api.update_product(id, patch).await?;
        info!(product_id = %updated.id, "Product updated");
        Ok(self.upsert(updated))
    }

    /// Delete a product and drop it from the cache.
    ///
    /// # Errors
    ///
    /// API errors; the cache is unchanged on failure.
    pub async fn delete(&mut self, id: &ProductId) -> Result<()> {
        self.api.delete_product(id).await?;
        self.records.retain(|r| &r.id != id);
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Replace the record with the same id, or append it.
    #[allow(clippy::indexing_slicing)] // index is in bounds: found or just pushed
    fn upsert(&mut self, record: ProductRecord) -> &ProductRecord {
        let index = match self.records.iter().position(|r| r.id == record.id) {
            Some(index) => {
                self.records[index] = record;
                index
            }
            None => {
                self.records.push(record);
                self.records.len() - 1
            }
        };
        &self.records[index]
    }
}
