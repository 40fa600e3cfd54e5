//! Catalog browsing.

use wonderland_client::Storefront;
use wonderland_client::api::ProductRecord;
use wonderland_core::{Category, ProductId};

use super::CommandError;
use crate::render;

/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub async fn list(
    shop: &mut Storefront,
    category: Option<Category>,
    refresh: bool,
) -> Result<(), CommandError> {
    if refresh {
        shop.products.refresh().await?;
    } else {
        shop.products.fetch_all().await?;
    }

    let records: Vec<&ProductRecord> = match category {
        Some(category) => shop.products.filter_by_category(category),
        None => shop.products.records().iter().collect(),
    };
    render::products(&records);
    Ok(())
}

/// # Errors
///
/// Returns an error if the product does not exist.
pub async fn show(shop: &mut Storefront, id: &str) -> Result<(), CommandError> {
    let product = shop.products.fetch_one(&ProductId::new(id)).await?;
    render::product(product);
    Ok(())
}

/// # Errors
///
/// Returns an error if the catalog (or the remote search) cannot be loaded.
pub async fn search(shop: &mut Storefront, query: &str, remote: bool) -> Result<(), CommandError> {
    if remote {
        let hits = shop.api.search_products(query).await?;
        render::products(&hits.iter().collect::<Vec<_>>());
        return Ok(());
    }

    shop.products.fetch_all().await?;
    render::products(&shop.products.search(query));
    Ok(())
}
