//! Seed the catalog from a YAML file.
//!
//! The file holds a `products` list in the same shape the admin product form
//! submits (see `crates/cli/seed/catalog.yaml`). Every entry is validated
//! before the first request; then each product is created in turn.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};
use wonderland_client::Storefront;
use wonderland_client::api::ProductDraft;

use super::CommandError;

/// Top-level layout of a seed file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<ProductDraft>,
}

impl SeedFile {
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a list of products.
    pub fn parse(content: &str) -> Result<Self, CommandError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Describe every entry that would be rejected, by position and name.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        self.products
            .iter()
            .enumerate()
            .filter_map(|(i, draft)| {
                draft
                    .validate()
                    .err()
                    .map(|e| format!("#{} ({}): {e}", i + 1, draft.name))
            })
            .collect()
    }
}

/// Create every product in the seed file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, if any entry is
/// invalid (nothing is created then), or if some creates fail.
pub async fn products(shop: &mut Storefront, file_path: &str) -> Result<(), CommandError> {
    let path = Path::new(file_path);
    info!(path = %file_path, "Loading products from file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::ReadFile {
            path: file_path.to_string(),
            source,
        })?;
    let seed = SeedFile::parse(&content)?;
    info!(products = seed.products.len(), "Parsed seed file");

    // Validate everything before creating anything
    let problems = seed.problems();
    if !problems.is_empty() {
        error!("Seed file validation failed:");
        for problem in &problems {
            error!("  - {problem}");
        }
        return Err(CommandError::InvalidSeed(problems.len()));
    }

    let total = seed.products.len();
    let mut failed = 0;
    for draft in &seed.products {
        match shop.products.create(draft).await {
            Ok(product) => info!(product_id = %product.id, name = %product.name, "Created"),
            Err(e) => {
                error!(name = %draft.name, "Failed to create product: {e}");
                failed += 1;
            }
        }
    }

    info!("Seeding complete!");
    info!("  Products created: {}", total - failed);

    if failed > 0 {
        return Err(CommandError::SeedIncomplete { failed, total });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use wonderland_core::Category;

    use super::*;

    #[test]
    fn test_bundled_catalog_is_valid() {
        let seed = SeedFile::parse(include_str!("../../seed/catalog.yaml")).unwrap();
        assert_eq!(seed.products.len(), 9);
        assert!(seed.problems().is_empty());

        let drone = &seed.products[2];
        assert_eq!(drone.name, "Drone Explorer");
        assert_eq!(drone.price, Decimal::from(12_999));
        assert_eq!(drone.category, Category::Electronic);
        assert_eq!(
            drone
                .category_attributes
                .as_ref()
                .and_then(|a| a.voltage.as_deref()),
            Some("3.7V")
        );
    }

    #[test]
    fn test_problems_name_the_entry() {
        let seed = SeedFile::parse(
            r"
products:
  - name: Robot Explorer
    brand: TechToys
    price: 4999
    category: Electronic
  - name: X
    brand: TechToys
    price: 0
    category: Plush
",
        )
        .unwrap();
        let problems = seed.problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].starts_with("#2 (X): Name must be between 2 and 255"));
    }

    fn offline_shop(dir: &std::path::Path) -> Storefront {
        let config =
            wonderland_client::ClientConfig::for_base_url("http://127.0.0.1:9/api", dir).unwrap();
        Storefront::open(&config).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_entries_stop_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("catalog.yaml");
        std::fs::write(
            &file,
            "products:\n  - {name: Kite, brand: S, price: 10, category: Plush}\n",
        )
        .unwrap();

        // An unreachable backend would fail with a network error instead
        let mut shop = offline_shop(dir.path());
        let result = products(&mut shop, file.to_str().unwrap()).await;
        assert!(matches!(result, Err(CommandError::InvalidSeed(1))));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut shop = offline_shop(dir.path());
        let missing = dir.path().join("nope.yaml");
        let result = products(&mut shop, missing.to_str().unwrap()).await;
        assert!(matches!(result, Err(CommandError::ReadFile { .. })));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let result = SeedFile::parse(
            "products:\n  - {name: Kite, brand: Sky, price: 10, category: Outdoor}\n",
        );
        assert!(matches!(result, Err(CommandError::SeedFile(_))));
    }
}
