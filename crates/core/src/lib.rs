//! StyleHub Core - Shared types library.
//!
//! This crate provides the wire contracts and pricing rules shared by the
//! StyleHub storefront client components:
//! - `client` - Authenticated request gateway, session, and like-state cache
//! - `cli` - Command-line front end for the storefront API
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage. This keeps it lightweight and allows it to be used
//! anywhere, including the mock backend in the integration tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, the response envelope, auth payloads, like
//!   state, coupons and discount rules, and the catalog/cart/order/claim DTOs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
