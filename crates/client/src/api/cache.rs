//! Cache types for product lookups.
//!
//! Single-product fetches and server-side searches are memoized for a short
//! time. Any admin write through the same client drops the whole cache.

use wonderland_core::ProductId;

use super::types::ProductRecord;

/// Cache key for product lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    /// Lowercased, trimmed search text.
    Search(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<ProductRecord>),
    Search(Vec<ProductRecord>),
}
