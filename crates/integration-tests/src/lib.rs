//! Integration tests for the Wonderland Toy Store client.
//!
//! [`TestBackend`] is an in-process stand-in for the REST backend: an axum
//! router over in-memory users, products and orders, bound to an ephemeral
//! port. Tests point a real [`Storefront`] at it and inspect both what the
//! client did and what the backend saw.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p wonderland-integration-tests
//! ```
//!
//! # Seed Data
//!
//! - An admin ([`ADMIN_EMAIL`]) and a customer ([`CUSTOMER_EMAIL`])
//! - Three products, one per category: `"1"` Robot Explorer (15 in stock),
//!   `"2"` Soft Teddy Bear (30) and `"3"` Chess Master (5)

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Path, Query, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use uuid::Uuid;
use wonderland_client::{ClientConfig, Storefront};

pub const ADMIN_EMAIL: &str = "admin@wonderland.pk";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const CUSTOMER_EMAIL: &str = "ali@example.pk";
pub const CUSTOMER_PASSWORD: &str = "secret123";

const CANCELLABLE: [&str; 3] = ["pending", "processing", "confirmed"];
const STATUSES: [&str; 6] = [
    "pending",
    "processing",
    "confirmed",
    "shipped",
    "delivered",
    "cancelled",
];
const LOW_STOCK: u32 = 10;

// =============================================================================
// In-memory data
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: &'static str,
    created_at: String,
    #[serde(skip)]
    password: String,
}

#[derive(Debug, Clone)]
struct ProductRow {
    id: String,
    name: String,
    brand: String,
    price: Decimal,
    quantity: u32,
    description: Option<String>,
    category: String,
    image: Option<String>,
    category_attributes: Value,
}

impl ProductRow {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "brand": self.brand,
            "price": decimal_to_f64(self.price),
            "quantity": self.quantity,
            "description": self.description,
            "category": self.category,
            "image": self.image,
            "categoryAttributes": self.category_attributes,
            "in_stock": self.quantity > 0,
            "created_at": "2025-12-23T10:00:00",
        })
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.brand.to_lowercase().contains(&query)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemRow {
    id: String,
    product_id: String,
    name: String,
    quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct OrderRow {
    id: String,
    order_number: String,
    user_id: String,
    user_name: String,
    user_email: String,
    items: Vec<OrderItemRow>,
    #[serde(with = "rust_decimal::serde::float")]
    total_amount: Decimal,
    status: String,
    delivery_address: String,
    city: Option<String>,
    postal_code: Option<String>,
    created_at: String,
}

/// One request as the backend received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path below the `/api` prefix, e.g. `/products/1`.
    pub path: String,
    pub bearer: Option<String>,
}

#[derive(Debug, Default)]
struct Db {
    users: Vec<UserRow>,
    tokens: HashMap<String, String>,
    products: Vec<ProductRow>,
    orders: Vec<OrderRow>,
    next_product: u32,
    next_order: u32,
    requests: Vec<RecordedRequest>,
    forced: Option<(StatusCode, String)>,
    omit_auth_user: bool,
}

type Shared = Arc<Mutex<Db>>;

impl Db {
    fn seeded() -> Self {
        let users = vec![
            UserRow {
                id: "admin1".to_string(),
                name: "Store Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                role: "admin",
                created_at: "2025-12-01T09:00:00".to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
            UserRow {
                id: "user1".to_string(),
                name: "Ali Khan".to_string(),
                email: CUSTOMER_EMAIL.to_string(),
                role: "customer",
                created_at: "2025-12-02T09:00:00".to_string(),
                password: CUSTOMER_PASSWORD.to_string(),
            },
        ];
        let products = vec![
            ProductRow {
                id: "1".to_string(),
                name: "Robot Explorer".to_string(),
                brand: "TechToys".to_string(),
                price: Decimal::from(4999),
                quantity: 15,
                description: Some("Programmable robot with obstacle sensors".to_string()),
                category: "Electronic".to_string(),
                image: None,
                category_attributes: json!({"batteryType": "AA", "voltage": "6V"}),
            },
            ProductRow {
                id: "2".to_string(),
                name: "Soft Teddy Bear".to_string(),
                brand: "CozyToys".to_string(),
                price: Decimal::from(2499),
                quantity: 30,
                description: Some("Huggable brown bear".to_string()),
                category: "Plush".to_string(),
                image: None,
                category_attributes: json!({"material": "Cotton", "size": "Medium"}),
            },
            ProductRow {
                id: "3".to_string(),
                name: "Chess Master".to_string(),
                brand: "GamePro".to_string(),
                price: Decimal::from(3200),
                quantity: 5,
                description: None,
                category: "BoardGame".to_string(),
                image: None,
                category_attributes: json!({"ageRange": "8+", "numberOfPlayers": "2"}),
            },
        ];
        Self {
            users,
            products,
            next_product: 4,
            next_order: 1,
            ..Self::default()
        }
    }

    fn issue_token(&mut self, user: &UserRow) -> Value {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user.id.clone());
        if self.omit_auth_user {
            json!({"access_token": token, "token_type": "bearer"})
        } else {
            json!({"access_token": token, "token_type": "bearer", "user": user})
        }
    }

    fn product_mut(&mut self, id: &str) -> Reply<&mut ProductRow> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Product not found"))
    }

    fn order_mut(&mut self, id: &str) -> Reply<&mut OrderRow> {
        self.orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Order not found"))
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

// =============================================================================
// Errors and auth
// =============================================================================

type Rejection = (StatusCode, Json<Value>);
type Reply<T> = Result<T, Rejection>;

fn reject(status: StatusCode, detail: &str) -> Rejection {
    (status, Json(json!({ "detail": detail })))
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn caller(db: &Db, headers: &HeaderMap) -> Reply<UserRow> {
    bearer(headers)
        .and_then(|token| db.tokens.get(&token))
        .and_then(|id| db.users.iter().find(|u| &u.id == id))
        .cloned()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Could not validate credentials"))
}

fn admin(db: &Db, headers: &HeaderMap) -> Reply<UserRow> {
    let user = caller(db, headers)?;
    if user.role != "admin" {
        return Err(reject(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(user)
}

/// Record every request, and short-circuit it when a failure is forced.
async fn record(State(db): State<Shared>, request: Request, next: Next) -> Response {
    let forced = {
        let mut db = db.lock();
        let path = request.uri().path();
        db.requests.push(RecordedRequest {
            method: request.method().clone(),
            path: path.strip_prefix("/api").unwrap_or(path).to_string(),
            bearer: bearer(request.headers()),
        });
        db.forced.clone()
    };
    if let Some((status, body)) = forced {
        return (status, [(header::CONTENT_TYPE, "application/json")], body).into_response();
    }
    next.run(request).await
}

// =============================================================================
// Auth handlers
// =============================================================================

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct Registration {
    email: String,
    name: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct ProfileChange {
    name: Option<String>,
    email: Option<String>,
}

async fn login(State(db): State<Shared>, Json(body): Json<Credentials>) -> Reply<Json<Value>> {
    let mut db = db.lock();
    let user = db
        .users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(&body.email) && u.password == body.password)
        .cloned()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Incorrect email or password"))?;
    Ok(Json(db.issue_token(&user)))
}

async fn register(
    State(db): State<Shared>,
    Json(body): Json<Registration>,
) -> Reply<(StatusCode, Json<Value>)> {
    let mut db = db.lock();
    if db.users.iter().any(|u| u.email.eq_ignore_ascii_case(&body.email)) {
        return Err(reject(StatusCode::BAD_REQUEST, "Email already registered"));
    }
    let user = UserRow {
        id: Uuid::new_v4().to_string(),
        name: body.name,
        email: body.email.to_lowercase(),
        role: "customer",
        created_at: "2025-12-23T10:00:00".to_string(),
        password: body.password,
    };
    db.users.push(user.clone());
    Ok((StatusCode::CREATED, Json(db.issue_token(&user))))
}

async fn me(State(db): State<Shared>, headers: HeaderMap) -> Reply<Json<UserRow>> {
    let db = db.lock();
    Ok(Json(caller(&db, &headers)?))
}

async fn update_profile(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ProfileChange>,
) -> Reply<Json<UserRow>> {
    let mut db = db.lock();
    let current = caller(&db, &headers)?;
    if let Some(email) = &body.email
        && db
            .users
            .iter()
            .any(|u| u.id != current.id && u.email.eq_ignore_ascii_case(email))
    {
        return Err(reject(StatusCode::BAD_REQUEST, "Email already in use"));
    }
    let user = db
        .users
        .iter_mut()
        .find(|u| u.id == current.id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "User not found"))?;
    if let Some(name) = body.name {
        user.name = name;
    }
    if let Some(email) = body.email {
        user.email = email;
    }
    Ok(Json(user.clone()))
}

// =============================================================================
// Product handlers
// =============================================================================

#[derive(Debug, Deserialize)]
struct CategoryQuery {
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductInput {
    name: String,
    brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(default)]
    quantity: u32,
    description: Option<String>,
    image: Option<String>,
    category: String,
    category_attributes: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductChange {
    name: Option<String>,
    brand: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    price: Option<Decimal>,
    quantity: Option<u32>,
    description: Option<String>,
    image: Option<String>,
    category: Option<String>,
    category_attributes: Option<Value>,
}

fn price_rejection() -> Rejection {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "detail": [{
                "loc": ["body", "price"],
                "msg": "Input should be greater than 0",
                "type": "greater_than"
            }]
        })),
    )
}

async fn list_products(
    State(db): State<Shared>,
    Query(query): Query<CategoryQuery>,
) -> Json<Vec<Value>> {
    let db = db.lock();
    Json(
        db.products
            .iter()
            .filter(|p| query.category.as_ref().is_none_or(|c| &p.category == c))
            .map(ProductRow::to_json)
            .collect(),
    )
}

async fn search_products(
    State(db): State<Shared>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Value>> {
    let db = db.lock();
    Json(
        db.products
            .iter()
            .filter(|p| p.matches(&query.q))
            .map(ProductRow::to_json)
            .collect(),
    )
}

async fn get_product(State(db): State<Shared>, Path(id): Path<String>) -> Reply<Json<Value>> {
    let mut db = db.lock();
    Ok(Json(db.product_mut(&id)?.to_json()))
}

async fn create_product(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<ProductInput>,
) -> Reply<(StatusCode, Json<Value>)> {
    let mut db = db.lock();
    admin(&db, &headers)?;
    if body.price <= Decimal::ZERO {
        return Err(price_rejection());
    }
    let product = ProductRow {
        id: db.next_product.to_string(),
        name: body.name,
        brand: body.brand,
        price: body.price,
        quantity: body.quantity,
        description: body.description,
        category: body.category,
        image: body.image,
        category_attributes: body.category_attributes.unwrap_or_else(|| json!({})),
    };
    db.next_product += 1;
    let created = product.to_json();
    db.products.push(product);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_product(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<ProductChange>,
) -> Reply<Json<Value>> {
    let mut db = db.lock();
    admin(&db, &headers)?;
    if body.price.is_some_and(|p| p <= Decimal::ZERO) {
        return Err(price_rejection());
    }
    let product = db.product_mut(&id)?;
    if let Some(name) = body.name {
        product.name = name;
    }
    if let Some(brand) = body.brand {
        product.brand = brand;
    }
    if let Some(price) = body.price {
        product.price = price;
    }
    if let Some(quantity) = body.quantity {
        product.quantity = quantity;
    }
    if let Some(description) = body.description {
        product.description = Some(description);
    }
    if let Some(image) = body.image {
        product.image = Some(image);
    }
    if let Some(category) = body.category {
        product.category = category;
    }
    if let Some(attributes) = body.category_attributes {
        product.category_attributes = attributes;
    }
    Ok(Json(product.to_json()))
}

async fn delete_product(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<StatusCode> {
    let mut db = db.lock();
    admin(&db, &headers)?;
    let before = db.products.len();
    db.products.retain(|p| p.id != id);
    if db.products.len() == before {
        return Err(reject(StatusCode::NOT_FOUND, "Product not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Order handlers
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderLineInput {
    product_id: String,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderInput {
    items: Vec<OrderLineInput>,
    delivery_address: String,
    city: Option<String>,
    postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

async fn create_order(
    State(db): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<OrderInput>,
) -> Reply<(StatusCode, Json<OrderRow>)> {
    let mut db = db.lock();
    let user = caller(&db, &headers)?;
    if body.items.is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "Order must contain at least one item"));
    }

    let mut items = Vec::with_capacity(body.items.len());
    for line in &body.items {
        let product = db
            .products
            .iter()
            .find(|p| p.id == line.product_id)
            .ok_or_else(|| {
                reject(
                    StatusCode::NOT_FOUND,
                    &format!("Product {} not found", line.product_id),
                )
            })?;
        if line.quantity > product.quantity {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                &format!("Insufficient stock for {}", product.name),
            ));
        }
        items.push(OrderItemRow {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            quantity: line.quantity,
            price: product.price,
        });
    }

    for item in &items {
        let product = db.product_mut(&item.product_id)?;
        product.quantity -= item.quantity;
    }

    let number = db.next_order;
    db.next_order += 1;
    let order = OrderRow {
        id: number.to_string(),
        order_number: format!("ORD-20251223-{number:05}"),
        user_id: user.id,
        user_name: user.name,
        user_email: user.email,
        total_amount: items
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum(),
        items,
        status: "pending".to_string(),
        delivery_address: body.delivery_address,
        city: body.city,
        postal_code: body.postal_code,
        created_at: "2025-12-23T10:00:00".to_string(),
    };
    db.orders.push(order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}

async fn my_orders(State(db): State<Shared>, headers: HeaderMap) -> Reply<Json<Vec<OrderRow>>> {
    let db = db.lock();
    let user = caller(&db, &headers)?;
    Ok(Json(
        db.orders
            .iter()
            .rev()
            .filter(|o| o.user_id == user.id)
            .cloned()
            .collect(),
    ))
}

fn owned_order<'a>(db: &'a mut Db, user: &UserRow, id: &str) -> Reply<&'a mut OrderRow> {
    let order = db.order_mut(id)?;
    if order.user_id != user.id && user.role != "admin" {
        return Err(reject(
            StatusCode::FORBIDDEN,
            "Not authorized to view this order",
        ));
    }
    Ok(order)
}

async fn get_order(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<Json<OrderRow>> {
    let mut db = db.lock();
    let user = caller(&db, &headers)?;
    Ok(Json(owned_order(&mut db, &user, &id)?.clone()))
}

async fn cancel_order(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<Json<OrderRow>> {
    let mut db = db.lock();
    let user = caller(&db, &headers)?;
    let order = owned_order(&mut db, &user, &id)?;
    if !CANCELLABLE.contains(&order.status.as_str()) {
        return Err(reject(StatusCode::BAD_REQUEST, "Order cannot be cancelled"));
    }
    order.status = "cancelled".to_string();
    let cancelled = order.clone();

    for item in &cancelled.items {
        if let Ok(product) = db.product_mut(&item.product_id) {
            product.quantity += item.quantity;
        }
    }
    Ok(Json(cancelled))
}

// =============================================================================
// Admin handlers
// =============================================================================

async fn dashboard(State(db): State<Shared>, headers: HeaderMap) -> Reply<Json<Value>> {
    let db = db.lock();
    admin(&db, &headers)?;
    let revenue: Decimal = db
        .orders
        .iter()
        .filter(|o| o.status == "delivered")
        .map(|o| o.total_amount)
        .sum();
    let recent: Vec<&OrderRow> = db.orders.iter().rev().take(5).collect();
    let low_stock: Vec<Value> = db
        .products
        .iter()
        .filter(|p| p.quantity < LOW_STOCK)
        .map(ProductRow::to_json)
        .collect();
    Ok(Json(json!({
        "totalProducts": db.products.len(),
        "totalOrders": db.orders.len(),
        "totalRevenue": decimal_to_f64(revenue),
        "totalUsers": db.users.iter().filter(|u| u.role == "customer").count(),
        "recentOrders": recent,
        "lowStockProducts": low_stock,
    })))
}

async fn admin_orders(
    State(db): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<StatusQuery>,
) -> Reply<Json<Vec<OrderRow>>> {
    let db = db.lock();
    admin(&db, &headers)?;
    Ok(Json(
        db.orders
            .iter()
            .rev()
            .filter(|o| {
                query
                    .status
                    .as_ref()
                    .is_none_or(|s| o.status.eq_ignore_ascii_case(s))
            })
            .cloned()
            .collect(),
    ))
}

async fn set_order_status(
    State(db): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Reply<Json<Value>> {
    let mut db = db.lock();
    admin(&db, &headers)?;
    let status = query
        .status
        .map(|s| s.to_lowercase())
        .filter(|s| STATUSES.contains(&s.as_str()))
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Invalid status"))?;
    let order = db.order_mut(&id)?;
    order.status.clone_from(&status);
    Ok(Json(json!({
        "id": order.id,
        "status": status,
        "message": "Order status updated",
    })))
}

// =============================================================================
// Test backend
// =============================================================================

/// A running mock backend. Stops when dropped.
pub struct TestBackend {
    pub addr: SocketAddr,
    db: Shared,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl TestBackend {
    /// Start a backend with the seed data on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let db: Shared = Arc::new(Mutex::new(Db::seeded()));

        let api = Router::new()
            .route("/auth/register", post(register))
            .route("/auth/login/json", post(login))
            .route("/auth/me", get(me))
            .route("/users/profile", put(update_profile))
            .route("/products", get(list_products).post(create_product))
            .route("/products/search", get(search_products))
            .route(
                "/products/{id}",
                get(get_product).put(update_product).delete(delete_product),
            )
            .route("/orders", post(create_order))
            .route("/orders/my-orders", get(my_orders))
            .route("/orders/{id}", get(get_order))
            .route("/orders/{id}/cancel", put(cancel_order))
            .route("/admin/dashboard", get(dashboard))
            .route("/admin/orders", get(admin_orders))
            .route("/admin/orders/{id}/status", put(set_order_status));

        let app = Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(db.clone(), record))
            .with_state(db.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        let (shutdown, mut shutdown_rx) = tokio::sync::watch::channel(false);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self { addr, db, shutdown }
    }

    /// Base URL the client should be configured with.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client configuration pointing at this backend.
    ///
    /// # Panics
    ///
    /// Panics if the URL is rejected, which would be a bug here.
    #[must_use]
    pub fn config(&self, data_dir: &FsPath) -> ClientConfig {
        ClientConfig::for_base_url(&self.api_url(), data_dir).expect("Invalid mock backend URL")
    }

    /// A storefront with its token persisted under `data_dir`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn storefront(&self, data_dir: &FsPath) -> Storefront {
        Storefront::open(&self.config(data_dir)).expect("Failed to open storefront")
    }

    /// A storefront signed in as `email`.
    ///
    /// # Panics
    ///
    /// Panics if the login is refused.
    pub async fn signed_in(&self, data_dir: &FsPath, email: &str, password: &str) -> Storefront {
        let mut shop = self.storefront(data_dir);
        shop.auth
            .login(email, &SecretString::from(password))
            .await
            .expect("Seeded login failed");
        shop
    }

    // -- Inspection ----------------------------------------------------------

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.db.lock().requests.clone()
    }

    /// How many requests hit `method path` (path below `/api`).
    #[must_use]
    pub fn request_count(&self, method: &Method, path: &str) -> usize {
        self.db
            .lock()
            .requests
            .iter()
            .filter(|r| &r.method == method && r.path == path)
            .count()
    }

    #[must_use]
    pub fn total_requests(&self) -> usize {
        self.db.lock().requests.len()
    }

    #[must_use]
    pub fn product_quantity(&self, id: &str) -> Option<u32> {
        self.db
            .lock()
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.quantity)
    }

    #[must_use]
    pub fn product_count(&self) -> usize {
        self.db.lock().products.len()
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.db.lock().orders.len()
    }

    // -- Manipulation --------------------------------------------------------

    /// Invalidate every issued token, as a server-side logout would.
    pub fn revoke_tokens(&self) {
        self.db.lock().tokens.clear();
    }

    /// Answer every request with `status` and `body` until [`Self::recover`].
    ///
    /// # Panics
    ///
    /// Panics on a status code outside 100..=999.
    pub fn fail_with(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("Invalid status code");
        self.db.lock().forced = Some((status, body.to_string()));
    }

    pub fn recover(&self) {
        self.db.lock().forced = None;
    }

    /// Leave the user out of login and registration responses.
    pub fn omit_user_in_auth_responses(&self) {
        self.db.lock().omit_auth_user = true;
    }

    /// Move an order along without going through the admin API.
    pub fn set_order_status(&self, id: &str, status: &str) {
        if let Some(order) = self.db.lock().orders.iter_mut().find(|o| o.id == id) {
            order.status = status.to_string();
        }
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
