//! Admin commands: products, orders and the dashboard.
//!
//! # Usage
//!
//! ```bash
//! wonderland admin create --name "Robot Explorer" --brand TechToys \
//!     --price 4999 --quantity 15 --category electronic \
//!     --attr batteryType=AA --attr voltage=6V
//! wonderland admin stock 1 30
//! wonderland admin set-status 7 shipped
//! ```

use clap::Args;
use rust_decimal::Decimal;
use wonderland_client::Storefront;
use wonderland_client::api::{ProductDraft, ProductPatch};
use wonderland_client::dashboard::{DashboardStats, LOW_STOCK_THRESHOLD};
use wonderland_core::validation::validate_stock;
use wonderland_core::{Category, CategoryAttributes, OrderId, OrderStatus, ProductId};

use super::CommandError;
use crate::render;

/// Fields of a new product.
#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(short, long)]
    pub name: String,

    #[arg(short, long)]
    pub brand: String,

    /// Price in PKR
    #[arg(short, long)]
    pub price: Decimal,

    /// Units in stock
    #[arg(short, long, default_value_t = 0)]
    pub quantity: u32,

    /// Electronic, Plush or BoardGame
    #[arg(short, long)]
    pub category: Category,

    #[arg(short, long)]
    pub description: Option<String>,

    /// Image URL
    #[arg(long)]
    pub image: Option<String>,

    /// Category attribute, e.g. `batteryType=AA` (repeatable)
    #[arg(long = "attr", value_name = "KEY=VALUE")]
    pub attributes: Vec<String>,
}

impl ProductArgs {
    /// # Errors
    ///
    /// `InvalidAttribute` for an attribute without `=`.
    pub fn into_draft(self) -> Result<ProductDraft, CommandError> {
        let attributes = parse_attributes(&self.attributes)?;
        Ok(ProductDraft {
            name: self.name,
            brand: self.brand,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            image: self.image,
            category: self.category,
            category_attributes: attributes,
        })
    }
}

/// Fields to change on an existing product. Unset flags are left alone.
#[derive(Debug, Default, Args)]
pub struct ProductPatchArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(short, long)]
    pub brand: Option<String>,

    #[arg(short, long)]
    pub price: Option<Decimal>,

    #[arg(short, long)]
    pub quantity: Option<u32>,

    #[arg(short, long)]
    pub category: Option<Category>,

    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(long)]
    pub image: Option<String>,

    #[arg(long = "attr", value_name = "KEY=VALUE")]
    pub attributes: Vec<String>,
}

impl ProductPatchArgs {
    /// # Errors
    ///
    /// `InvalidAttribute` for an attribute without `=`.
    pub fn into_patch(self) -> Result<ProductPatch, CommandError> {
        let attributes = parse_attributes(&self.attributes)?;
        Ok(ProductPatch {
            name: self.name,
            brand: self.brand,
            price: self.price,
            quantity: self.quantity,
            description: self.description,
            image: self.image,
            category: self.category,
            category_attributes: attributes,
        })
    }
}

fn parse_attributes(pairs: &[String]) -> Result<Option<CategoryAttributes>, CommandError> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut attributes = CategoryAttributes::default();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| CommandError::InvalidAttribute(pair.clone()))?;
        attributes.set(key.trim(), value.trim());
    }
    Ok(Some(attributes))
}

/// Admin commands are refused locally for customer sessions.
///
/// # Errors
///
/// `LoginRequired` without a session, `AdminRequired` for customers.
pub fn require_admin(shop: &Storefront) -> Result<(), CommandError> {
    if !shop.auth.is_authenticated() {
        return Err(CommandError::LoginRequired);
    }
    if !shop.auth.is_admin() {
        return Err(CommandError::AdminRequired);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if a request fails.
pub async fn dashboard(shop: &mut Storefront, local: bool) -> Result<(), CommandError> {
    if !local {
        let summary = shop.api.admin_dashboard().await?;
        render::admin_dashboard(&summary);
        return Ok(());
    }

    shop.products.fetch_all().await?;
    let orders = shop.api.admin_orders(None).await?;
    let stats = DashboardStats::compute(shop.products.records(), &orders, LOW_STOCK_THRESHOLD);
    render::stats(&stats);
    render::products(&shop.products.low_stock(LOW_STOCK_THRESHOLD));
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn orders(shop: &Storefront, status: Option<OrderStatus>) -> Result<(), CommandError> {
    let orders = shop.api.admin_orders(status).await?;
    render::orders(&orders);
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn set_status(
    shop: &Storefront,
    id: &str,
    status: OrderStatus,
) -> Result<(), CommandError> {
    let change = shop.api.set_order_status(&OrderId::new(id), status).await?;
    render::message(&format!("Order {} is now {}.", change.id, change.status));
    Ok(())
}

/// # Errors
///
/// Validation errors or the backend's rejection.
pub async fn create(shop: &mut Storefront, args: ProductArgs) -> Result<(), CommandError> {
    let draft = args.into_draft()?;
    let product = shop.products.create(&draft).await?;
    render::message("Product created.");
    render::product(product);
    Ok(())
}

/// # Errors
///
/// Validation errors or the backend's rejection.
pub async fn update(
    shop: &mut Storefront,
    id: &str,
    fields: ProductPatchArgs,
) -> Result<(), CommandError> {
    let patch = fields.into_patch()?;
    let product = shop.products.update(&ProductId::new(id), &patch).await?;
    render::message("Product updated.");
    render::product(product);
    Ok(())
}

/// # Errors
///
/// `NegativeStock` for a negative quantity, otherwise the backend's
/// rejection.
pub async fn set_stock(shop: &mut Storefront, id: &str, quantity: i64) -> Result<(), CommandError> {
    validate_stock(quantity)?;
    let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
    let product = shop
        .products
        .update(&ProductId::new(id), &ProductPatch::stock(quantity))
        .await?;
    render::message(&format!(
        "{} now has {} in stock.",
        product.name, product.available_quantity
    ));
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub async fn delete(shop: &mut Storefront, id: &str) -> Result<(), CommandError> {
    shop.products.delete(&ProductId::new(id)).await?;
    render::message("Product deleted.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attributes() {
        let attributes = parse_attributes(&["batteryType= AA ".to_string(), "voltage=6V".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(attributes.battery_type.as_deref(), Some("AA"));
        assert_eq!(attributes.voltage.as_deref(), Some("6V"));

        assert!(parse_attributes(&[]).unwrap().is_none());
        assert!(matches!(
            parse_attributes(&["=6V".to_string()]),
            Err(CommandError::InvalidAttribute(_))
        ));
        assert!(matches!(
            parse_attributes(&["voltage".to_string()]),
            Err(CommandError::InvalidAttribute(_))
        ));
    }

    #[test]
    fn test_patch_args_only_set_fields() {
        let patch = ProductPatchArgs {
            quantity: Some(30),
            ..ProductPatchArgs::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch, ProductPatch::stock(30));
    }
}
