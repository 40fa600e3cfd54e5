//! Admin dashboard and order management endpoints.
//!
//! The backend checks the role; calling these with a customer session yields
//! `ClientError::Api` with status 403.

use reqwest::Method;
use tracing::instrument;
use wonderland_core::{OrderId, OrderStatus};

use super::{AdminDashboard, ApiClient, Auth, Order, OrderStatusChange};
use crate::error::Result;

impl ApiClient {
    /// Store-wide totals (`GET /admin/dashboard`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard> {
        self.get_json(&["admin", "dashboard"], &[]).await
    }

    /// Every order, optionally only those in `status` (`GET /admin/orders`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn admin_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        match status {
            Some(status) => {
                self.get_json(&["admin", "orders"], &[("status", status.as_str())])
                    .await
            }
            None => self.get_json(&["admin", "orders"], &[]).await,
        }
    }

    /// Move an order to `status` (`PUT /admin/orders/:id/status?status=`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<OrderStatusChange> {
        let builder = self
            .request(Method::PUT, &["admin", "orders", id.as_str(), "status"])?
            .query(&[("status", status.as_str())]);
        self.execute_json(builder, Auth::Bearer).await
    }
}
