//! The session-scoped cart.
//!
//! A cart is an ordered list of line items, unique by product id. Every
//! quantity mutation is clamped to `[1, stock]`; a line reduced to zero is
//! removed rather than retained. The cart also carries the (at most one)
//! applied coupon code - applying a new coupon replaces the previous one,
//! and clearing the cart drops it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::types::{CategoryId, ProductId};

/// A product snapshot plus quantity.
///
/// Name, slug, price and image are frozen at add time so the cart renders
/// consistently; the stock snapshot is advisory and refreshed on every add.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category_id: CategoryId,
    pub stock: u32,
    pub quantity: u32,
}

impl CartItem {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_owned),
            category_id: product.category_id,
            stock: product.stock,
            quantity: quantity.clamp(1, product.stock),
        }
    }

    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart mutation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// The product cannot enter the cart because nothing is in stock.
    #[error("{0} is out of stock")]
    OutOfStock(String),
}

/// An ordered collection of line items owned by a single session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
    applied_coupon: Option<String>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a product already has a line in the cart.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product already has a line, its quantity is incremented and
    /// its stock snapshot refreshed; otherwise a new line is appended. The
    /// resulting quantity is clamped to the product's stock.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when the product has no stock at
    /// all; a zero-quantity line is never created.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if product.stock == 0 {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.stock = product.stock;
            item.price = product.price;
            item.quantity = item.quantity.saturating_add(quantity).clamp(1, product.stock);
        } else {
            self.items.push(CartItem::from_product(product, quantity));
        }
        Ok(())
    }

    /// Remove a product's line. Idempotent: absent lines are a no-op.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Set a line's quantity.
    ///
    /// A target of zero or less removes the line. Anything else is clamped
    /// to `[1, stock]` using the line's stock snapshot. Unknown product ids
    /// are a silent no-op.
    pub fn update_quantity(&mut self, product_id: ProductId, new_quantity: i64) {
        if new_quantity <= 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            let requested = u32::try_from(new_quantity).unwrap_or(u32::MAX);
            item.quantity = requested.clamp(1, item.stock);
        }
    }

    /// Empty the cart, dropping all lines and any applied coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.applied_coupon = None;
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of price × quantity over all lines. Recomputed on every call.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// The code of the currently applied coupon, if any.
    #[must_use]
    pub fn applied_coupon(&self) -> Option<&str> {
        self.applied_coupon.as_deref()
    }

    /// Attach a coupon code, replacing any previously applied one.
    ///
    /// A cart holds zero or one coupon; coupons never stack.
    pub fn set_applied_coupon(&mut self, code: impl Into<String>) {
        self.applied_coupon = Some(code.into());
    }

    /// Detach the applied coupon unconditionally.
    pub fn clear_coupon(&mut self) {
        self.applied_coupon = None;
    }
}
