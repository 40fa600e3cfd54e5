//! Wonderland Core - Shared domain types library.
//!
//! This crate provides the types used across all Wonderland components:
//! - `client` - HTTP API client and client-side stores
//! - `cli` - Command-line storefront and admin tools
//! - `integration-tests` - Mock backend and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and client-side
//! validation - no I/O, no HTTP clients. This keeps it lightweight and
//! allows it to be used anywhere, including the mock backend.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, money, emails, roles, categories and statuses
//! - [`validation`] - Form validation that runs before any request is sent

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ValidationError;
