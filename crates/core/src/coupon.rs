//! Coupon rules and the eligibility evaluator.
//!
//! [`evaluate`] is a pure function over the cart, the (nullable) shopper,
//! the shopper's order history and the catalog. It short-circuits at the
//! first failed check, in a fixed order, because the rejection reason is
//! surfaced verbatim to the shopper.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::order::Order;
use crate::shopper::Shopper;
use crate::types::{CouponId, ProductId};

/// What a coupon takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountKind {
    /// A flat amount in rupees.
    Fixed(Decimal),
    /// A percentage of the subtotal, in (0, 100].
    Percentage(Decimal),
}

/// Precondition class gating a coupon beyond its discount mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CouponTrigger {
    /// No trigger; eligibility depends only on the other rules.
    #[default]
    None,
    /// Only valid while the shopper has no prior orders.
    FirstOrder,
    /// Only valid when today matches the shopper's birthday (month and
    /// day; year ignored).
    Birthday,
}

/// A discount code and its eligibility rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: CouponId,
    /// Unique, matched case-insensitively.
    pub code: String,
    pub description: String,
    pub discount: DiscountKind,
    /// Minimum cart subtotal required, re-checked on every pricing pass.
    #[serde(default)]
    pub min_purchase: Option<Decimal>,
    /// When non-empty, the coupon only applies to carts containing at
    /// least one of these products.
    #[serde(default)]
    pub applicable_product_ids: Vec<ProductId>,
    #[serde(default)]
    pub trigger: CouponTrigger,
    pub is_active: bool,
}

impl Coupon {
    /// Whether this coupon is scoped to specific products.
    #[must_use]
    pub fn is_product_scoped(&self) -> bool {
        !self.applicable_product_ids.is_empty()
    }

    /// Whether a product falls inside this coupon's scope. Unscoped
    /// coupons cover every product.
    #[must_use]
    pub fn covers_product(&self, product_id: ProductId) -> bool {
        !self.is_product_scoped() || self.applicable_product_ids.contains(&product_id)
    }
}

/// Why a coupon was refused. Every variant is a user-facing message, not a
/// system failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponRejection {
    #[error("invalid coupon code")]
    InvalidCode,
    #[error("this coupon is no longer active")]
    Inactive,
    #[error("this coupon is only valid on your first order")]
    NotFirstOrder,
    #[error("add your birthday to your profile to use this coupon")]
    NoBirthdaySet,
    #[error("this coupon is only valid on your birthday")]
    NotBirthday,
    #[error("cart total must be at least ₹{min} to use this coupon")]
    BelowMinimum { min: Decimal },
    #[error("this coupon does not apply to any item in your cart")]
    NotApplicable,
}

/// Validate a coupon code against the current cart, shopper and history.
///
/// Checks run in this exact order and stop at the first failure:
/// 1. case-insensitive code lookup
/// 2. the coupon is active
/// 3. `first_order` trigger: a logged-in shopper with an empty history
/// 4. `birthday` trigger: a birthday on file matching today's month and day
/// 5. minimum purchase against the current subtotal
/// 6. product scope: the cart holds at least one covered product
///
/// On success the caller attaches the returned coupon's code to the cart;
/// this function never mutates anything.
///
/// # Errors
///
/// Returns the first applicable [`CouponRejection`].
pub fn evaluate<'a>(
    code: &str,
    cart: &Cart,
    shopper: Option<&Shopper>,
    order_history: &[Order],
    catalog: &'a Catalog,
    today: NaiveDate,
) -> Result<&'a Coupon, CouponRejection> {
    let coupon = catalog
        .coupon_by_code(code)
        .ok_or(CouponRejection::InvalidCode)?;

    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }

    match coupon.trigger {
        CouponTrigger::None => {}
        CouponTrigger::FirstOrder => {
            if shopper.is_none() || !order_history.is_empty() {
                return Err(CouponRejection::NotFirstOrder);
            }
        }
        CouponTrigger::Birthday => {
            let birthday = shopper
                .and_then(|s| s.birthday)
                .ok_or(CouponRejection::NoBirthdaySet)?;
            if (birthday.month(), birthday.day()) != (today.month(), today.day()) {
                return Err(CouponRejection::NotBirthday);
            }
        }
    }

    if let Some(min) = coupon.min_purchase {
        if cart.subtotal() < min {
            return Err(CouponRejection::BelowMinimum { min });
        }
    }

    if coupon.is_product_scoped()
        && !cart
            .items()
            .iter()
            .any(|item| coupon.covers_product(item.product_id))
    {
        return Err(CouponRejection::NotApplicable);
    }

    Ok(coupon)
}

/// Active coupons worth surfacing on a product page: those whose scope is
/// empty or includes the product.
#[must_use]
pub fn eligible_for_product(catalog: &Catalog, product_id: ProductId) -> Vec<&Coupon> {
    catalog
        .coupons()
        .iter()
        .filter(|c| c.is_active && c.covers_product(product_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Product};
    use crate::types::{CategoryId, ShopperId};

    fn product(id: i32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Lungi {id}"),
            slug: format!("lungi-{id}"),
            category_id: CategoryId::new(1),
            price: Decimal::from(price),
            original_price: None,
            stock: 10,
            images: vec!["/images/lungi.jpg".to_string()],
            reviews: Vec::new(),
        }
    }

    fn coupon(code: &str) -> Coupon {
        Coupon {
            id: CouponId::new(1),
            code: code.to_string(),
            description: String::new(),
            discount: DiscountKind::Percentage(Decimal::TEN),
            min_purchase: None,
            applicable_product_ids: Vec::new(),
            trigger: CouponTrigger::None,
            is_active: true,
        }
    }

    fn catalog_with(products: Vec<Product>, coupons: Vec<Coupon>) -> Catalog {
        let categories = vec![Category {
            id: CategoryId::new(1),
            name: "Lungis".to_string(),
            slug: "lungis".to_string(),
            parent_id: None,
        }];
        Catalog::new(products, categories, coupons).expect("catalog")
    }

    fn shopper(birthday: Option<NaiveDate>) -> Shopper {
        Shopper {
            id: ShopperId::new(1),
            name: "Muthu".to_string(),
            birthday,
            addresses: Vec::new(),
        }
    }

    fn cart_with(catalog: &Catalog, id: i32, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        cart.add(catalog.product(ProductId::new(id)).expect("product"), quantity)
            .expect("add");
        cart
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 1).expect("date")
    }

    #[test]
    fn unknown_code_is_rejected() {
        let catalog = catalog_with(vec![product(1, 499)], vec![coupon("FESTIVE10")]);
        let cart = cart_with(&catalog, 1, 1);
        let err = evaluate("NOPE", &cart, None, &[], &catalog, today()).expect_err("invalid");
        assert_eq!(err, CouponRejection::InvalidCode);
    }

    #[test]
    fn code_match_is_case_insensitive() {
        let catalog = catalog_with(vec![product(1, 499)], vec![coupon("FESTIVE10")]);
        let cart = cart_with(&catalog, 1, 1);
        let found = evaluate("festive10", &cart, None, &[], &catalog, today()).expect("apply");
        assert_eq!(found.code, "FESTIVE10");
    }

    #[test]
    fn inactive_coupon_is_rejected_before_other_rules() {
        let mut c = coupon("FESTIVE10");
        c.is_active = false;
        c.min_purchase = Some(Decimal::from(100_000));
        let catalog = catalog_with(vec![product(1, 499)], vec![c]);
        let cart = cart_with(&catalog, 1, 1);
        let err = evaluate("FESTIVE10", &cart, None, &[], &catalog, today()).expect_err("inactive");
        assert_eq!(err, CouponRejection::Inactive);
    }

    #[test]
    fn first_order_requires_login_and_empty_history() {
        let mut c = coupon("WELCOME50");
        c.trigger = CouponTrigger::FirstOrder;
        let catalog = catalog_with(vec![product(1, 499)], vec![c]);
        let cart = cart_with(&catalog, 1, 1);

        let err =
            evaluate("WELCOME50", &cart, None, &[], &catalog, today()).expect_err("anonymous");
        assert_eq!(err, CouponRejection::NotFirstOrder);

        let s = shopper(None);
        assert!(evaluate("WELCOME50", &cart, Some(&s), &[], &catalog, today()).is_ok());
    }

    #[test]
    fn birthday_coupon_requires_birthday_on_file() {
        let mut c = coupon("HBD20");
        c.trigger = CouponTrigger::Birthday;
        let catalog = catalog_with(vec![product(1, 499)], vec![c]);
        let cart = cart_with(&catalog, 1, 1);

        let s = shopper(None);
        let err = evaluate("HBD20", &cart, Some(&s), &[], &catalog, today())
            .expect_err("no birthday set");
        assert_eq!(err, CouponRejection::NoBirthdaySet);
    }

    #[test]
    fn birthday_coupon_rejected_when_today_does_not_match() {
        let mut c = coupon("HBD20");
        c.trigger = CouponTrigger::Birthday;
        let catalog = catalog_with(vec![product(1, 499)], vec![c]);
        let cart = cart_with(&catalog, 1, 1);

        let s = shopper(NaiveDate::from_ymd_opt(1990, 5, 15));
        let err =
            evaluate("HBD20", &cart, Some(&s), &[], &catalog, today()).expect_err("not birthday");
        assert_eq!(err, CouponRejection::NotBirthday);
    }

    #[test]
    fn birthday_match_ignores_the_year() {
        let mut c = coupon("HBD20");
        c.trigger = CouponTrigger::Birthday;
        let catalog = catalog_with(vec![product(1, 499)], vec![c]);
        let cart = cart_with(&catalog, 1, 1);

        let s = shopper(NaiveDate::from_ymd_opt(1990, 8, 1));
        assert!(evaluate("HBD20", &cart, Some(&s), &[], &catalog, today()).is_ok());
    }

    #[test]
    fn below_minimum_is_rejected_with_the_threshold() {
        let mut c = coupon("FESTIVE10");
        c.min_purchase = Some(Decimal::from(1000));
        let catalog = catalog_with(vec![product(1, 400)], vec![c]);
        let cart = cart_with(&catalog, 1, 2); // subtotal 800
        let err =
            evaluate("FESTIVE10", &cart, None, &[], &catalog, today()).expect_err("below minimum");
        assert_eq!(
            err,
            CouponRejection::BelowMinimum {
                min: Decimal::from(1000)
            }
        );
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn product_scoped_coupon_rejected_without_a_covered_item() {
        let mut c = coupon("LUNGIKING");
        c.applicable_product_ids = vec![ProductId::new(1)];
        let catalog = catalog_with(vec![product(1, 499), product(2, 250)], vec![c]);
        let cart = cart_with(&catalog, 2, 1);
        let err = evaluate("LUNGIKING", &cart, None, &[], &catalog, today())
            .expect_err("not applicable");
        assert_eq!(err, CouponRejection::NotApplicable);
    }

    #[test]
    fn product_scoped_coupon_applies_when_a_covered_item_is_present() {
        let mut c = coupon("LUNGIKING");
        c.applicable_product_ids = vec![ProductId::new(1)];
        let catalog = catalog_with(vec![product(1, 499), product(2, 250)], vec![c]);
        let mut cart = cart_with(&catalog, 2, 1);
        cart.add(catalog.product(ProductId::new(1)).expect("product"), 1)
            .expect("add");
        assert!(evaluate("LUNGIKING", &cart, None, &[], &catalog, today()).is_ok());
    }

    #[test]
    fn display_eligibility_respects_scope_and_active_flag() {
        let mut scoped = coupon("LUNGIKING");
        scoped.id = CouponId::new(2);
        scoped.applicable_product_ids = vec![ProductId::new(1)];
        let mut inactive = coupon("OLD");
        inactive.id = CouponId::new(3);
        inactive.is_active = false;
        let catalog = catalog_with(
            vec![product(1, 499), product(2, 250)],
            vec![coupon("FESTIVE10"), scoped, inactive],
        );

        let for_one: Vec<&str> = eligible_for_product(&catalog, ProductId::new(1))
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(for_one, vec!["FESTIVE10", "LUNGIKING"]);

        let for_two: Vec<&str> = eligible_for_product(&catalog, ProductId::new(2))
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        assert_eq!(for_two, vec!["FESTIVE10"]);
    }
}
