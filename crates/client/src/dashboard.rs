//! Admin dashboard figures computed from local data.

use rust_decimal::Decimal;
use serde::Serialize;
use wonderland_core::{Money, OrderStatus};

use crate::api::{Order, ProductRecord};

/// Products with fewer units than this are flagged on the dashboard.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: usize,
    pub low_stock_products: usize,
    pub total_orders: usize,
    pub pending_orders: usize,
    /// Sum over delivered orders only.
    pub total_revenue: Decimal,
}

impl DashboardStats {
    #[must_use]
    pub fn compute(products: &[ProductRecord], orders: &[Order], low_stock_threshold: u32) -> Self {
        Self {
            total_products: products.len(),
            low_stock_products: products
                .iter()
                .filter(|p| p.available_quantity < low_stock_threshold)
                .count(),
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            total_revenue: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Delivered)
                .map(|o| o.total_amount)
                .sum(),
        }
    }

    #[must_use]
    pub fn revenue(&self) -> Money {
        Money::pkr(self.total_revenue)
    }
}
