//! Subtotal, discount and total computation.
//!
//! [`quote`] is pure and idempotent: the same cart and coupon state always
//! produce the same numbers, and nothing is mutated. It runs on every cart
//! mutation and every coupon change, which is also where an applied
//! coupon's minimum purchase gets re-validated - a coupon is never "locked
//! in" by a subtotal it no longer meets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::coupon::{Coupon, DiscountKind};
use crate::types::CurrencyCode;

/// Flat shipping fee in rupees, added at checkout and never
/// discount-eligible.
const SHIPPING_FEE_RUPEES: i64 = 50;

/// The flat shipping fee.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::from(SHIPPING_FEE_RUPEES)
}

/// A priced cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Sum of price × quantity over all lines.
    pub subtotal: Decimal,
    /// Amount taken off the subtotal; always in `[0, subtotal]`.
    pub discount: Decimal,
    /// `subtotal - discount`.
    pub total: Decimal,
    /// Flat shipping fee.
    pub shipping_fee: Decimal,
    /// Amount charged: `total + shipping_fee`.
    pub order_total: Decimal,
    pub currency: CurrencyCode,
}

/// Price a cart under the (optionally) applied coupon.
///
/// The coupon is assumed to have passed [`crate::coupon::evaluate`] when it
/// was applied; the rules that depend on cart contents - minimum purchase
/// and product scope - are re-checked here, because the cart can change
/// after application. A coupon whose minimum is no longer met, or whose
/// last covered product was removed, contributes zero discount but stays
/// attached to the cart.
///
/// # Panics
///
/// Panics if the cart's subtotal is negative. Line prices are validated
/// positive on catalog load, so a negative subtotal means corrupted state
/// and a silently wrong total would be worse than a crash.
#[must_use]
pub fn quote(cart: &Cart, applied: Option<&Coupon>) -> Quote {
    let subtotal = cart.subtotal();
    assert!(
        subtotal >= Decimal::ZERO,
        "cart subtotal is negative: {subtotal}"
    );

    let discount = applied.map_or(Decimal::ZERO, |coupon| {
        if coupon
            .min_purchase
            .is_some_and(|min| subtotal < min)
        {
            return Decimal::ZERO;
        }
        if coupon.is_product_scoped()
            && !cart
                .items()
                .iter()
                .any(|item| coupon.covers_product(item.product_id))
        {
            return Decimal::ZERO;
        }
        let raw = match coupon.discount {
            DiscountKind::Percentage(percent) => subtotal * percent / Decimal::ONE_HUNDRED,
            DiscountKind::Fixed(amount) => amount,
        };
        raw.clamp(Decimal::ZERO, subtotal)
    });

    let total = subtotal - discount;
    Quote {
        subtotal,
        discount,
        total,
        shipping_fee: shipping_fee(),
        order_total: total + shipping_fee(),
        currency: CurrencyCode::INR,
    }
}
