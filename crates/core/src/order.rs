//! Checkout-time order assembly.
//!
//! [`place_order`] freezes a priced cart into an immutable [`Order`]. It is
//! pure: the caller supplies the order number and timestamp, appends the
//! result to the order store, and clears the session cart afterwards. A
//! failed placement therefore never leaves partial state behind.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::pricing::Quote;
use crate::shopper::{Address, Shopper};
use crate::types::{AddressId, OrderStatus, PaymentMethod, ProductId, ShopperId};

/// A human-facing order number: `LM-` plus a zero-padded suffix drawn from
/// a strictly increasing sequence.
///
/// Suffixes past 999999 simply widen; uniqueness comes from the sequence,
/// not the width.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Build an order number from a sequence value.
    #[must_use]
    pub fn from_sequence(seq: u64) -> Self {
        Self(format!("LM-{seq:06}"))
    }

    /// The full number, e.g. `LM-000042`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric suffix, used to seed the sequence from persisted orders.
    #[must_use]
    pub fn suffix(&self) -> Option<u64> {
        self.0.strip_prefix("LM-")?.parse().ok()
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A line item frozen at order time. Owns its strings, so later catalog
/// edits cannot retroactively alter it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub quantity: u32,
}

/// An immutable snapshot of a completed checkout.
///
/// Only `status` and `reviewed_products` change after creation, and only
/// through the admin fulfillment workflow and the review gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderNumber,
    pub placed_at: DateTime<Utc>,
    pub shopper_id: ShopperId,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping_fee: Decimal,
    /// Amount charged, including shipping.
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub address: Address,
    /// Tracks which purchased products the shopper has reviewed; gates the
    /// review-submission UI.
    #[serde(default)]
    pub reviewed_products: HashMap<ProductId, bool>,
}

impl Order {
    /// Record that the shopper reviewed one of this order's products.
    pub fn mark_reviewed(&mut self, product_id: ProductId) {
        if self.items.iter().any(|i| i.product_id == product_id) {
            self.reviewed_products.insert(product_id, true);
        }
    }
}

/// Order placement precondition failures. All are surfaced to the caller;
/// none are retried automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaceOrderError {
    #[error("cannot place an order with an empty cart")]
    EmptyCart,
    #[error("select a shipping address before placing the order")]
    NoAddress,
    #[error("sign in to place an order")]
    NotAuthenticated,
    /// Stock changed between cart time and order time. The cart clamp is
    /// advisory; this re-validation against the latest catalog read is
    /// authoritative.
    #[error("only {available} of {name} left in stock")]
    InsufficientStock { name: String, available: u32 },
}

/// Freeze a priced cart into an [`Order`].
///
/// Preconditions, checked in order: the shopper is signed in, the cart is
/// non-empty, the address id resolves to one of the shopper's saved
/// addresses, and every line's quantity is still covered by the catalog's
/// current stock.
///
/// # Errors
///
/// Returns a [`PlaceOrderError`]; the cart is untouched on any failure.
pub fn place_order(
    cart: &Cart,
    quote: &Quote,
    shopper: Option<&Shopper>,
    address_id: Option<AddressId>,
    payment_method: PaymentMethod,
    catalog: &Catalog,
    id: OrderNumber,
    placed_at: DateTime<Utc>,
) -> Result<Order, PlaceOrderError> {
    let shopper = shopper.ok_or(PlaceOrderError::NotAuthenticated)?;

    if cart.is_empty() {
        return Err(PlaceOrderError::EmptyCart);
    }

    let address = address_id
        .and_then(|id| shopper.address(id))
        .ok_or(PlaceOrderError::NoAddress)?;

    for item in cart.items() {
        let available = catalog.product(item.product_id).map_or(0, |p| p.stock);
        if available < item.quantity {
            return Err(PlaceOrderError::InsufficientStock {
                name: item.name.clone(),
                available,
            });
        }
    }

    let items = cart
        .items()
        .iter()
        .map(|item| OrderItem {
            product_id: item.product_id,
            name: item.name.clone(),
            slug: item.slug.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity: item.quantity,
        })
        .collect();

    Ok(Order {
        id,
        placed_at,
        shopper_id: shopper.id,
        customer_name: shopper.name.clone(),
        items,
        subtotal: quote.subtotal,
        discount: quote.discount,
        shipping_fee: quote.shipping_fee,
        total: quote.order_total,
        coupon_code: cart.applied_coupon().map(str::to_owned),
        status: OrderStatus::Processing,
        payment_method,
        address: address.clone(),
        reviewed_products: HashMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Product};
    use crate::pricing::quote as price_cart;
    use crate::types::CategoryId;

    fn product(id: i32, price: i64, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Lungi {id}"),
            slug: format!("lungi-{id}"),
            category_id: CategoryId::new(1),
            price: Decimal::from(price),
            original_price: None,
            stock,
            images: vec!["/images/lungi.jpg".to_string()],
            reviews: Vec::new(),
        }
    }

    fn catalog_with(products: Vec<Product>) -> Catalog {
        let categories = vec![Category {
            id: CategoryId::new(1),
            name: "Lungis".to_string(),
            slug: "lungis".to_string(),
            parent_id: None,
        }];
        Catalog::new(products, categories, vec![]).expect("catalog")
    }

    fn shopper() -> Shopper {
        Shopper {
            id: ShopperId::new(1),
            name: "Muthu".to_string(),
            birthday: None,
            addresses: vec![Address {
                id: AddressId::new(1),
                label: "Home".to_string(),
                line1: "12 Beach Road".to_string(),
                city: "Chennai".to_string(),
                state: "Tamil Nadu".to_string(),
                pin_code: "600001".to_string(),
            }],
        }
    }

    fn placed_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("timestamp")
    }

    fn place(
        cart: &Cart,
        shopper_ref: Option<&Shopper>,
        address: Option<AddressId>,
        catalog: &Catalog,
    ) -> Result<Order, PlaceOrderError> {
        let q = price_cart(cart, None);
        place_order(
            cart,
            &q,
            shopper_ref,
            address,
            PaymentMethod::Cod,
            catalog,
            OrderNumber::from_sequence(1),
            placed_at(),
        )
    }

    #[test]
    fn order_number_formats_and_parses() {
        let n = OrderNumber::from_sequence(42);
        assert_eq!(n.as_str(), "LM-000042");
        assert_eq!(n.suffix(), Some(42));

        let wide = OrderNumber::from_sequence(1_234_567);
        assert_eq!(wide.as_str(), "LM-1234567");
        assert_eq!(wide.suffix(), Some(1_234_567));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let catalog = catalog_with(vec![]);
        let s = shopper();
        let err = place(&Cart::new(), Some(&s), Some(AddressId::new(1)), &catalog)
            .expect_err("empty cart");
        assert_eq!(err, PlaceOrderError::EmptyCart);
    }

    #[test]
    fn anonymous_checkout_is_rejected() {
        let catalog = catalog_with(vec![product(1, 499, 5)]);
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 1)
            .expect("add");
        let err = place(&cart, None, Some(AddressId::new(1)), &catalog).expect_err("anonymous");
        assert_eq!(err, PlaceOrderError::NotAuthenticated);
    }

    #[test]
    fn missing_or_unknown_address_is_rejected() {
        let catalog = catalog_with(vec![product(1, 499, 5)]);
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 1)
            .expect("add");
        let s = shopper();

        let err = place(&cart, Some(&s), None, &catalog).expect_err("no address");
        assert_eq!(err, PlaceOrderError::NoAddress);

        let err = place(&cart, Some(&s), Some(AddressId::new(99)), &catalog)
            .expect_err("unknown address");
        assert_eq!(err, PlaceOrderError::NoAddress);
    }

    #[test]
    fn stock_is_revalidated_against_the_latest_catalog() {
        let catalog = catalog_with(vec![product(1, 499, 5)]);
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 4)
            .expect("add");

        // Another session bought most of the stock after cart time.
        let drained = catalog_with(vec![product(1, 499, 2)]);
        let s = shopper();
        let err = place(&cart, Some(&s), Some(AddressId::new(1)), &drained)
            .expect_err("insufficient stock");
        assert_eq!(
            err,
            PlaceOrderError::InsufficientStock {
                name: "Lungi 1".to_string(),
                available: 2
            }
        );
    }

    #[test]
    fn order_freezes_prices_against_later_catalog_edits() {
        let mut catalog = catalog_with(vec![product(1, 499, 5)]);
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 1)
            .expect("add");
        let s = shopper();
        let order = place(&cart, Some(&s), Some(AddressId::new(1)), &catalog).expect("order");

        // Admin raises the price after the order was placed.
        catalog
            .product_mut(ProductId::new(1))
            .expect("product")
            .price = Decimal::from(999);

        assert_eq!(order.items[0].price, Decimal::from(499));
        assert_eq!(order.subtotal, Decimal::from(499));
    }

    #[test]
    fn order_captures_quote_status_and_payment() {
        let catalog = catalog_with(vec![product(1, 600, 10)]);
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 2)
            .expect("add");
        let s = shopper();
        let order = place(&cart, Some(&s), Some(AddressId::new(1)), &catalog).expect("order");

        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.payment_method, PaymentMethod::Cod);
        assert_eq!(order.customer_name, "Muthu");
        assert_eq!(order.subtotal, Decimal::from(1200));
        assert_eq!(order.total, Decimal::from(1250)); // includes shipping
        assert!(order.reviewed_products.is_empty());
    }

    #[test]
    fn mark_reviewed_only_accepts_purchased_products() {
        let catalog = catalog_with(vec![product(1, 499, 5)]);
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 1)
            .expect("add");
        let s = shopper();
        let mut order = place(&cart, Some(&s), Some(AddressId::new(1)), &catalog).expect("order");

        order.mark_reviewed(ProductId::new(99));
        assert!(order.reviewed_products.is_empty());

        order.mark_reviewed(ProductId::new(1));
        assert_eq!(order.reviewed_products.get(&ProductId::new(1)), Some(&true));
    }
}
