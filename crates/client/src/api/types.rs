//! Wire types for the REST API.
//!
//! Field names follow what the backend emits: camelCase for most fields,
//! with a few snake_case stragglers (`access_token`, `in_stock`,
//! `created_at`) kept via explicit renames. Prices are JSON numbers on the
//! wire and [`Decimal`] in memory.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use wonderland_core::validation::{
    NAME_LENGTH, PRODUCT_TEXT_LENGTH, validate_delivery_address, validate_length, validate_price,
};
use wonderland_core::{
    Category, CategoryAttributes, Email, OrderId, OrderItemId, OrderStatus, ProductId, Role,
    UserId, ValidationError,
};

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// =============================================================================
// Auth Types
// =============================================================================

/// A user account as the backend describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body returned by login and registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Some backend builds omit the user; it is then fetched from `/auth/me`.
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
}

/// Partial profile update. Unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// Trim fields, drop blank ones, and check what remains.
    ///
    /// # Errors
    ///
    /// `EmptyUpdate` when nothing is left to send, otherwise the first
    /// invalid field.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let email = self.email.filter(|e| !e.trim().is_empty());
        if name.is_none() && email.is_none() {
            return Err(ValidationError::EmptyUpdate);
        }
        if let Some(name) = &name {
            validate_length("Name", name, NAME_LENGTH)?;
        }
        let email = email
            .map(|e| Email::parse(&e).map(Email::into_inner))
            .transpose()?;
        Ok(Self { name, email })
    }
}

// =============================================================================
// Product Types
// =============================================================================

/// One catalog entry as cached on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(rename = "quantity")]
    pub available_quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub category: Category,
    #[serde(rename = "image", default, deserialize_with = "null_as_default")]
    pub image_ref: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_attributes: CategoryAttributes,
    #[serde(rename = "in_stock", default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProductRecord {
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.available_quantity > 0
    }
}

/// A new product, as submitted from the admin product form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_attributes: Option<CategoryAttributes>,
}

impl ProductDraft {
    /// # Errors
    ///
    /// The first field that the backend would reject.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_length("Name", &self.name, PRODUCT_TEXT_LENGTH)?;
        validate_length("Brand", &self.brand, PRODUCT_TEXT_LENGTH)?;
        validate_price(self.price)
    }
}

/// Partial product update. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_attributes: Option<CategoryAttributes>,
}

impl ProductPatch {
    /// A patch that only changes the stock level.
    #[must_use]
    pub fn stock(quantity: u32) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// # Errors
    ///
    /// `EmptyUpdate` for a patch with no fields, otherwise the first set
    /// field the backend would reject.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        if let Some(name) = &self.name {
            validate_length("Name", name, PRODUCT_TEXT_LENGTH)?;
        }
        if let Some(brand) = &self.brand {
            validate_length("Brand", brand, PRODUCT_TEXT_LENGTH)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

// =============================================================================
// Order Types
// =============================================================================

/// One line of a placed order, priced at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderItemId>,
    pub product_id: ProductId,
    /// The admin endpoints call this `productName`.
    #[serde(default, alias = "productName", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// Product and quantity as sent when placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Where an order should be delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryDetails {
    pub address: String,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl DeliveryDetails {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// `AddressTooShort` if the address is under five characters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_delivery_address(&self.address)
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl CreateOrderRequest {
    #[must_use]
    pub fn new(items: Vec<OrderItemInput>, delivery: DeliveryDetails) -> Self {
        Self {
            items,
            delivery_address: delivery.address.trim().to_string(),
            city: delivery.city,
            postal_code: delivery.postal_code,
        }
    }
}

// =============================================================================
// Admin Types
// =============================================================================

/// Summary returned by `GET /admin/dashboard`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_products: u64,
    pub total_orders: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub total_users: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recent_orders: Vec<Order>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub low_stock_products: Vec<ProductRecord>,
}

/// Acknowledgement from `PUT /admin/orders/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChange {
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// =============================================================================
// Error Bodies
// =============================================================================

/// Error body shapes the backend produces: `{"detail": "..."}`,
/// `{"detail": [{"msg": "..."}]}` (validation) or `{"message": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        let from_detail = match self.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Array(items)) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        let usable = |message: &String| !message.trim().is_empty();
        from_detail
            .filter(usable)
            .or_else(|| self.message.filter(usable))
    }
}
