//! Customer order endpoints.

use reqwest::Method;
use tracing::instrument;
use wonderland_core::OrderId;

use super::{ApiClient, Auth, CreateOrderRequest, Order};
use crate::error::Result;

impl ApiClient {
    /// Place an order (`POST /orders`).
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with the backend's message for stock shortfalls
    /// and unknown products.
    #[instrument(skip(self, request), fields(lines = request.items.len()))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> Result<Order> {
        let order: Order = self
            .send_json(Method::POST, &["orders"], request, Auth::Bearer)
            .await?;
        // Stock levels changed on the server.
        self.invalidate_cache();
        Ok(order)
    }

    /// The signed-in user's orders (`GET /orders/my-orders`).
    ///
    /// # Errors
    ///
    /// `ClientError::Auth` without a valid session.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        self.get_json(&["orders", "my-orders"], &[]).await
    }

    /// # Errors
    ///
    /// `ClientError::Api` with status 404 (unknown) or 403 (someone else's).
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Order> {
        self.get_json(&["orders", id.as_str()], &[]).await
    }

    /// Cancel an order (`PUT /orders/:id/cancel`).
    ///
    /// # Errors
    ///
    /// `ClientError::Api` with status 400 once the order has shipped.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId) -> Result<Order> {
        let builder = self.request(Method::PUT, &["orders", id.as_str(), "cancel"])?;
        let order: Order = self.execute_json(builder, Auth::Bearer).await?;
        self.invalidate_cache();
        Ok(order)
    }
}
