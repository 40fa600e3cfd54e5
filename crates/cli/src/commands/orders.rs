//! Checkout and order history.

use wonderland_client::Storefront;
use wonderland_client::api::DeliveryDetails;
use wonderland_core::OrderId;

use super::CommandError;
use crate::render;

fn require_login(shop: &Storefront) -> Result<(), CommandError> {
    if shop.auth.is_authenticated() {
        Ok(())
    } else {
        Err(CommandError::LoginRequired)
    }
}

/// # Errors
///
/// `LoginRequired`, an empty cart, a short address, or the backend's
/// rejection. The cart is left intact on any failure.
pub async fn checkout(
    shop: &mut Storefront,
    address: String,
    city: Option<String>,
    postal_code: Option<String>,
) -> Result<(), CommandError> {
    require_login(shop)?;
    let delivery = DeliveryDetails {
        address,
        city,
        postal_code,
    };
    let order = shop.orders.checkout(&mut shop.cart, delivery).await?;
    render::message("Order placed. Thank you for shopping with Wonderland!");
    render::order(order);
    Ok(())
}

/// # Errors
///
/// `LoginRequired` or a failed request.
pub async fn list(shop: &mut Storefront) -> Result<(), CommandError> {
    require_login(shop)?;
    let orders = shop.orders.load_mine().await?;
    render::orders(orders);
    Ok(())
}

/// # Errors
///
/// `LoginRequired` or a failed request.
pub async fn show(shop: &mut Storefront, id: &str) -> Result<(), CommandError> {
    require_login(shop)?;
    let order = shop.orders.get(&OrderId::new(id)).await?;
    render::order(order);
    Ok(())
}

/// Cancel an order, refreshing it first so the cancellable check sees the
/// current status.
///
/// # Errors
///
/// `LoginRequired`, an order past the cancellable stages, or a failed
/// request.
pub async fn cancel(shop: &mut Storefront, id: &str) -> Result<(), CommandError> {
    require_login(shop)?;
    let id = OrderId::new(id);
    shop.orders.get(&id).await?;
    let order = shop.orders.cancel(&id).await?;
    render::message("Order cancelled.");
    render::order(order);
    Ok(())
}
