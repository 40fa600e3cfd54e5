//! Shopping cart.
//!
//! Purely local: nothing here touches the network. Totals are exact
//! decimal sums, available both as store methods and as free functions over
//! a snapshot of lines.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wonderland_core::{Category, Money, ProductId, ValidationError};

use crate::api::{OrderItemInput, ProductRecord};
use crate::storage::{read_json, write_json};

/// One product and its quantity within the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image_ref: String,
    pub category: Category,
}

impl CartLine {
    /// Build a line from a catalog entry.
    ///
    /// # Errors
    ///
    /// `ZeroQuantity` for a zero quantity, `ExceedsStock` when asking for
    /// more than the product has available.
    pub fn from_product(product: &ProductRecord, quantity: u32) -> Result<Self, ValidationError> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        if quantity > product.available_quantity {
            return Err(ValidationError::ExceedsStock {
                available: product.available_quantity,
            });
        }
        Ok(Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            image_ref: product.image_ref.clone(),
            category: product.category,
        })
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Sum of unit price times quantity over `lines`. Zero for no lines.
#[must_use]
pub fn total_price(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::subtotal).sum()
}

/// Sum of quantities over `lines`.
#[must_use]
pub fn total_item_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity)).sum()
}

/// The in-progress order.
///
/// Lines keep insertion order and never share a product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SavedCart")]
pub struct CartStore {
    lines: Vec<CartLine>,
}

/// On-disk layout of a cart; rebuilt line by line on load.
#[derive(Deserialize)]
struct SavedCart {
    lines: Vec<CartLine>,
}

impl From<SavedCart> for CartStore {
    fn from(saved: SavedCart) -> Self {
        let mut cart = Self::new();
        for line in saved.lines {
            let product_id = line.product_id.clone();
            if let Err(e) = cart.add_item(line) {
                tracing::warn!(product_id = %product_id, error = %e, "Dropping saved cart line");
            }
        }
        cart
    }
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cart saved by [`CartStore::save`]. A missing file is an empty
    /// cart.
    ///
    /// # Errors
    ///
    /// `ClientError::Storage` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> crate::Result<Self> {
        Ok(read_json(path)?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// `ClientError::Storage` if the file cannot be written.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        write_json(path, self)
    }

    /// Add a line, summing quantities if the product is already present.
    ///
    /// The existing line keeps its name and price.
    ///
    /// # Errors
    ///
    /// `ZeroQuantity` for a zero-quantity line.
    pub fn add_item(&mut self, line: CartLine) -> Result<(), ValidationError> {
        if line.quantity == 0 {
            return Err(ValidationError::ZeroQuantity);
        }
        match self.line_mut(&line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
        Ok(())
    }

    /// Add `quantity` of a catalog product, capped at its available stock
    /// counting what is already in the cart.
    ///
    /// # Errors
    ///
    /// `ZeroQuantity`, or `ExceedsStock` if the combined quantity would
    /// exceed what the product has available.
    pub fn add_product(
        &mut self,
        product: &ProductRecord,
        quantity: u32,
    ) -> Result<(), ValidationError> {
        let in_cart = self.line(&product.id).map_or(0, |line| line.quantity);
        if quantity > 0 && in_cart.saturating_add(quantity) > product.available_quantity {
            return Err(ValidationError::ExceedsStock {
                available: product.available_quantity,
            });
        }
        self.add_item(CartLine::from_product(product, quantity)?)
    }

    /// Remove the line for `product_id`, returning it if it was present.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| &l.product_id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Set a line's quantity. Zero or below removes the line; an absent
    /// product is left alone.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn total_price(&self) -> Decimal {
        total_price(&self.lines)
    }

    /// [`CartStore::total_price`] in PKR, ready for display.
    #[must_use]
    pub fn total(&self) -> Money {
        Money::pkr(self.total_price())
    }

    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        total_item_count(&self.lines)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The cart as the `items` of an order request.
    #[must_use]
    pub fn order_items(&self) -> Vec<OrderItemInput> {
        self.lines
            .iter()
            .map(|line| OrderItemInput {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
            })
            .collect()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(id),
            name: format!("Toy {id}"),
            unit_price: Decimal::from(price),
            quantity,
            image_ref: String::new(),
            category: Category::Plush,
        }
    }

    fn product(id: &str, available: u32) -> ProductRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Robot Explorer",
            "brand": "TechToys",
            "price": 4999.99,
            "quantity": available,
            "category": "Electronic"
        }))
        .unwrap()
    }

    #[test]
    fn test_totals() {
        let mut cart = CartStore::new();
        cart.add_item(line("1", 1000, 2)).unwrap();
        cart.add_item(line("2", 500, 1)).unwrap();

        assert_eq!(cart.total_price(), Decimal::from(2500));
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(cart.total().to_string(), "PKR 2,500.00");
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = CartStore::new();
        assert_eq!(cart.total_price(), Decimal::ZERO);
        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_adding_same_product_merges() {
        let mut cart = CartStore::new();
        cart.add_item(line("1", 1000, 1)).unwrap();
        cart.add_item(line("1", 1000, 1)).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.line(&ProductId::new("1")).unwrap().quantity, 2);
    }

    #[test]
    fn test_repeated_adds_sum_quantities() {
        let mut cart = CartStore::new();
        let quantities = [3, 1, 7, 2, 5];
        for q in quantities {
            cart.add_item(line("7", 250, q)).unwrap();
        }
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(
            u64::from(cart.line(&ProductId::new("7")).unwrap().quantity),
            quantities.iter().map(|q| u64::from(*q)).sum::<u64>()
        );
    }

    #[test]
    fn test_zero_quantity_add_is_rejected() {
        let mut cart = CartStore::new();
        assert_eq!(
            cart.add_item(line("1", 1000, 0)),
            Err(ValidationError::ZeroQuantity)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_to_zero_or_below_removes() {
        for quantity in [0, -1] {
            let mut cart = CartStore::new();
            cart.add_item(line("1", 1000, 2)).unwrap();
            cart.update_quantity(&ProductId::new("1"), quantity);
            assert!(cart.line(&ProductId::new("1")).is_none());
        }
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = CartStore::new();
        cart.add_item(line("1", 1000, 2)).unwrap();
        cart.update_quantity(&ProductId::new("1"), 5);
        assert_eq!(cart.total_item_count(), 5);

        // Absent id is a no-op
        cart.update_quantity(&ProductId::new("9"), 3);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = CartStore::new();
        cart.add_item(line("1", 1000, 2)).unwrap();
        cart.add_item(line("2", 500, 1)).unwrap();

        let removed = cart.remove_item(&ProductId::new("1")).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.remove_item(&ProductId::new("1")).is_none());

        cart.clear();
        assert_eq!(cart.total_item_count(), 0);
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_add_product_respects_stock() {
        let robot = product("1", 3);
        let mut cart = CartStore::new();
        cart.add_product(&robot, 2).unwrap();
        assert_eq!(
            cart.add_product(&robot, 2),
            Err(ValidationError::ExceedsStock { available: 3 })
        );
        cart.add_product(&robot, 1).unwrap();
        assert_eq!(cart.total_price(), Decimal::new(1_499_997, 2));
    }

    #[test]
    fn test_order_items() {
        let mut cart = CartStore::new();
        cart.add_item(line("1", 1000, 2)).unwrap();
        cart.add_item(line("2", 500, 1)).unwrap();
        let items = cart.order_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id.as_str(), "1");
        assert_eq!(items[0].quantity, 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");

        assert!(CartStore::load(&path).unwrap().is_empty());

        let mut cart = CartStore::new();
        cart.add_product(&product("1", 10), 2).unwrap();
        cart.save(&path).unwrap();

        assert_eq!(CartStore::load(&path).unwrap(), cart);
    }

    #[test]
    fn test_load_drops_empty_lines_and_merges_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        let saved = serde_json::json!({
            "lines": [line("1", 1000, 0), line("2", 500, 1), line("1", 1000, 2), line("2", 500, 3)]
        });
        std::fs::write(&path, saved.to_string()).unwrap();

        let cart = CartStore::load(&path).unwrap();
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].product_id.as_str(), "2");
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.line(&ProductId::new("1")).unwrap().quantity, 2);
        assert_eq!(cart.total_item_count(), 6);
    }
}
