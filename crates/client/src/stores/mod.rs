//! Client-side state containers.
//!
//! Each store is an owned value. Stores never call each other; they share
//! only the [`ApiClient`](crate::ApiClient) handle they were built with.
//! Mutating operations take `&mut self`, so two overlapping logins or
//! fetches on the same store cannot interleave.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod products;

pub use auth::{AuthStore, Session};
pub use cart::{CartLine, CartStore};
pub use orders::OrderStore;
pub use products::{FetchState, ProductStore};
