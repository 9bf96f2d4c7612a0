//! Lungi Mart Core - Domain library.
//!
//! This crate holds the pricing core of Lungi Mart:
//! - [`cart`] - Session-scoped cart with stock-clamped line items
//! - [`coupon`] - Coupon rules and the eligibility evaluator
//! - [`pricing`] - Subtotal/discount/total computation
//! - [`order`] - Checkout-time order assembly
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no async. Catalog data, the current shopper and the order history are
//! passed in explicitly as context, which keeps every operation here
//! independently testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and statuses
//! - [`catalog`] - Products, categories, reviews and the `Catalog` context
//! - [`shopper`] - The (nullable) current-user collaborator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod coupon;
pub mod order;
pub mod pricing;
pub mod shopper;
pub mod types;

pub use cart::{Cart, CartError, CartItem};
pub use catalog::{Catalog, CatalogError, Category, Product, Review};
pub use coupon::{Coupon, CouponRejection, CouponTrigger, DiscountKind};
pub use order::{Order, OrderItem, OrderNumber, PlaceOrderError};
pub use pricing::{Quote, quote, shipping_fee};
pub use shopper::{Address, Shopper};
pub use types::*;
