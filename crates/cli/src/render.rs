//! Terminal output for command results.
//!
//! Results go to stdout; logs and prompts go to stderr.

#![allow(clippy::print_stdout)]

use wonderland_client::api::{AdminDashboard, Order, ProductRecord, User};
use wonderland_client::dashboard::DashboardStats;
use wonderland_client::stores::{CartStore, Session};
use wonderland_core::Money;

pub fn message(text: &str) {
    println!("{text}");
}

pub fn welcome(session: &Session) {
    println!("Welcome, {}!", session.user.name);
    if session.is_admin() {
        println!("You are signed in as an administrator.");
    }
}

pub fn session(session: &Session) {
    user(&session.user);
    println!(
        "Session:  since {}",
        session.since.format("%Y-%m-%d %H:%M UTC")
    );
}

pub fn user(user: &User) {
    println!("Name:     {}", user.name);
    println!("Email:    {}", user.email);
    println!("Role:     {}", user.role);
    if let Some(created) = &user.created_at {
        println!("Joined:   {created}");
    }
}

/// One line per product.
pub fn products(records: &[&ProductRecord]) {
    if records.is_empty() {
        println!("No products found.");
        return;
    }
    println!(
        "{:<6} {:<28} {:<14} {:<11} {:>16} {:>6}",
        "ID", "NAME", "BRAND", "CATEGORY", "PRICE", "STOCK"
    );
    for record in records {
        println!(
            "{:<6} {:<28} {:<14} {:<11} {:>16} {:>6}",
            record.id,
            truncate(&record.name, 28),
            truncate(&record.brand, 14),
            record.category,
            Money::pkr(record.unit_price).to_string(),
            record.available_quantity
        );
    }
    println!("{} product(s)", records.len());
}

pub fn product(record: &ProductRecord) {
    println!("{} ({})", record.name, record.id);
    println!("  Brand:    {}", record.brand);
    println!("  Category: {}", record.category);
    println!("  Price:    {}", Money::pkr(record.unit_price));
    if record.is_in_stock() {
        println!("  Stock:    {}", record.available_quantity);
    } else {
        println!("  Stock:    out of stock");
    }
    for (key, value) in record.category_attributes.known() {
        println!("  {key}: {value}");
    }
    if !record.description.is_empty() {
        println!();
        println!("  {}", record.description);
    }
}

pub fn cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    for line in cart.lines() {
        println!(
            "{:<6} {:<28} {:>4} x {:>14} = {:>16}",
            line.product_id,
            truncate(&line.name, 28),
            line.quantity,
            Money::pkr(line.unit_price).to_string(),
            Money::pkr(line.subtotal()).to_string()
        );
    }
    println!(
        "{} item(s), total {}",
        cart.total_item_count(),
        cart.total()
    );
}

pub fn order(order: &Order) {
    println!("Order {} ({})", order.order_number, order.id);
    println!("  Status:   {}", order.status);
    if let Some(name) = &order.user_name {
        println!("  Customer: {name}");
    }
    if let Some(address) = &order.delivery_address {
        let city = order.city.as_deref().map_or(String::new(), |c| format!(", {c}"));
        println!("  Deliver:  {address}{city}");
    }
    if let Some(created) = &order.created_at {
        println!("  Placed:   {created}");
    }
    for item in &order.items {
        println!(
            "    {:>3} x {:<28} {:>14}",
            item.quantity,
            truncate(item.name.as_deref().unwrap_or(item.product_id.as_str()), 28),
            Money::pkr(item.price).to_string()
        );
    }
    println!("  Total:    {}", Money::pkr(order.total_amount));
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet.");
        return;
    }
    println!(
        "{:<6} {:<22} {:<11} {:>6} {:>16}",
        "ID", "NUMBER", "STATUS", "ITEMS", "TOTAL"
    );
    for order in orders {
        println!(
            "{:<6} {:<22} {:<11} {:>6} {:>16}",
            order.id,
            order.order_number,
            order.status,
            order.item_count(),
            Money::pkr(order.total_amount).to_string()
        );
    }
}

/// Figures computed locally from the catalog and order list.
pub fn stats(stats: &DashboardStats) {
    println!("Products:        {}", stats.total_products);
    println!("Low stock:       {}", stats.low_stock_products);
    println!("Orders:          {}", stats.total_orders);
    println!("Pending orders:  {}", stats.pending_orders);
    println!("Revenue:         {}", stats.revenue());
    println!();
}

/// The backend's own dashboard summary.
pub fn admin_dashboard(summary: &AdminDashboard) {
    println!("Products:        {}", summary.total_products);
    println!("Orders:          {}", summary.total_orders);
    println!("Customers:       {}", summary.total_users);
    println!("Revenue:         {}", Money::pkr(summary.total_revenue));

    if !summary.recent_orders.is_empty() {
        println!();
        println!("Recent orders");
        orders(&summary.recent_orders);
    }
    if !summary.low_stock_products.is_empty() {
        println!();
        println!("Low stock");
        products(&summary.low_stock_products.iter().collect::<Vec<_>>());
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('~');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Teddy", 28), "Teddy");
        assert_eq!(truncate("Interactive Robot Dog", 10), "Interacti~");
        assert_eq!(truncate("Plüschtier", 10), "Plüschtier");
    }
}
