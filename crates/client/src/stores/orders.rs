//! Order history and checkout.

use tracing::{info, instrument};
use wonderland_core::{OrderId, ValidationError};

use super::cart::CartStore;
use crate::api::{ApiClient, CreateOrderRequest, DeliveryDetails, Order};
use crate::error::{ClientError, Result};

/// The signed-in user's orders, newest first.
#[derive(Debug)]
pub struct OrderStore {
    api: ApiClient,
    orders: Vec<Order>,
}

impl OrderStore {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self {
            api,
            orders: Vec::new(),
        }
    }

    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Place an order for everything in `cart`.
    ///
    /// The cart is cleared only once the backend has accepted the order.
    ///
    /// # Errors
    ///
    /// `EmptyCart` or `AddressTooShort` before any request; otherwise the
    /// backend's rejection (e.g. insufficient stock), with the cart intact.
    #[instrument(skip(self, cart, delivery), fields(lines = cart.lines().len()))]
    pub async fn checkout(
        &mut self,
        cart: &mut CartStore,
        delivery: DeliveryDetails,
    ) -> Result<&Order> {
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        delivery.validate()?;

        let request = CreateOrderRequest::new(cart.order_items(), delivery);
        let order = self.api.create_order(&request).await?;
        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            total = %order.total_amount,
            "Order placed"
        );

        cart.clear();
        Ok(self.merge(order))
    }

    /// Replace the local history with the server's.
    ///
    /// # Errors
    ///
    /// `ClientError::Auth` without a session; the history is unchanged on
    /// failure.
    #[instrument(skip(self))]
    pub async fn load_mine(&mut self) -> Result<&[Order]> {
        self.orders = self.api.my_orders().await?;
        Ok(&self.orders)
    }

    /// Fetch one order and merge it into the local history.
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with status 404 or 403.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&mut self, id: &OrderId) -> Result<&Order> {
        let order = self.api.get_order(id).await?;
        Ok(self.merge(order))
    }

    /// Cancel an order from the local history.
    ///
    /// Orders that have shipped, been delivered or already been cancelled
    /// are refused without contacting the backend.
    ///
    /// # Errors
    ///
    /// `ClientError::NotFound` if the order is not in the local history,
    /// `NotCancellable` for orders past the cancellable stages, otherwise
    /// the backend's rejection.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel(&mut self, id: &OrderId) -> Result<&Order> {
        let status = self
            .order(id)
            .map(|o| o.status)
            .ok_or_else(|| ClientError::NotFound(format!("order {id}")))?;
        if !status.is_cancellable() {
            return Err(ValidationError::NotCancellable(status).into());
        }

        let cancelled = self.api.cancel_order(id).await?;
        info!(status = %cancelled.status, "Order cancelled");
        Ok(self.merge(cancelled))
    }

    /// Replace the order with the same id, or put it at the front.
    #[allow(clippy::indexing_slicing)] // index is in bounds: found or 0 after insert
    fn merge(&mut self, order: Order) -> &Order {
        let index = match self.orders.iter().position(|o| o.id == order.id) {
            Some(index) => {
                self.orders[index] = order;
                index
            }
            None => {
                self.orders.insert(0, order);
                0
            }
        };
        &self.orders[index]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use serde_json::json;
    use wonderland_core::{Category, OrderStatus, ProductId};

    use super::*;
    use crate::config::ClientConfig;
    use crate::storage::MemoryTokenStorage;
    use crate::stores::CartLine;

    fn offline_store() -> OrderStore {
        let config = ClientConfig::for_base_url("http://127.0.0.1:9/api", "/tmp/wl-test").unwrap();
        OrderStore::new(ApiClient::new(&config, Arc::new(MemoryTokenStorage::with_token("t"))).unwrap())
    }

    fn order(id: &str, status: &str) -> Order {
        serde_json::from_value(json!({
            "id": id,
            "orderNumber": format!("ORD-20251223-0000{id}"),
            "userId": "u1",
            "items": [{"productId": "1", "quantity": 1, "price": 4999}],
            "totalAmount": 4999,
            "status": status
        }))
        .unwrap()
    }

    fn one_line_cart() -> CartStore {
        let mut cart = CartStore::new();
        cart.add_item(CartLine {
            product_id: ProductId::new("1"),
            name: "Robot Explorer".to_string(),
            unit_price: Decimal::from(4999),
            quantity: 1,
            image_ref: String::new(),
            category: Category::Electronic,
        })
        .unwrap();
        cart
    }

    #[tokio::test]
    async fn test_checkout_rejects_empty_cart() {
        let mut store = offline_store();
        let mut cart = CartStore::new();
        let err = store
            .checkout(&mut cart, DeliveryDetails::new("123 Main Street"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_checkout_rejects_short_address() {
        let mut store = offline_store();
        let mut cart = one_line_cart();
        let err = store
            .checkout(&mut cart, DeliveryDetails::new(" St "))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Delivery address must be at least 5 characters"
        );
        assert_eq!(cart.total_item_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let mut store = offline_store();
        let mut cart = one_line_cart();
        let err = store
            .checkout(&mut cart, DeliveryDetails::new("123 Main Street, Karachi"))
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert_eq!(cart.total_item_count(), 1);
        assert!(store.orders().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_of_shipped_order_never_reaches_network() {
        let mut store = offline_store();
        store.merge(order("1", "shipped"));

        let err = store.cancel(&OrderId::new("1")).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Validation(ValidationError::NotCancellable(OrderStatus::Shipped))
        ));
    }

    #[tokio::test]
    async fn test_cancel_unknown_order() {
        let mut store = offline_store();
        let err = store.cancel(&OrderId::new("404")).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[test]
    fn test_merge_replaces_or_prepends() {
        let mut store = offline_store();
        store.merge(order("1", "pending"));
        store.merge(order("2", "pending"));
        store.merge(order("1", "cancelled"));

        let ids: Vec<&str> = store.orders().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
        assert_eq!(
            store.order(&OrderId::new("1")).unwrap().status,
            OrderStatus::Cancelled
        );
    }
}
