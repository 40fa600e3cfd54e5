//! Cart commands. The binary saves the cart after each one.

use wonderland_client::Storefront;
use wonderland_core::ProductId;

use super::CommandError;
use crate::render;

/// Add a product, looked up from the API so the price and stock are
/// current.
///
/// # Errors
///
/// Unknown product, zero quantity, or more than the product has in stock.
pub async fn add(shop: &mut Storefront, product_id: &str, quantity: u32) -> Result<(), CommandError> {
    let product = shop.products.fetch_one(&ProductId::new(product_id)).await?;
    shop.cart.add_product(product, quantity)?;
    render::message(&format!("Added {quantity} x {} to your cart.", product.name));
    render::cart(&shop.cart);
    Ok(())
}

pub fn remove(shop: &mut Storefront, product_id: &str) {
    match shop.cart.remove_item(&ProductId::new(product_id)) {
        Some(line) => render::message(&format!("Removed {} from your cart.", line.name)),
        None => render::message("That product is not in your cart."),
    }
}

pub fn set(shop: &mut Storefront, product_id: &str, quantity: i64) {
    shop.cart.update_quantity(&ProductId::new(product_id), quantity);
    render::cart(&shop.cart);
}

pub fn show(shop: &Storefront) {
    render::cart(&shop.cart);
}

pub fn clear(shop: &mut Storefront) {
    shop.cart.clear();
    render::message("Your cart is empty.");
}
