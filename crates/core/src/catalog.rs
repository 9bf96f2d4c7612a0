//! Products, categories, reviews and the `Catalog` context object.
//!
//! The catalog is read-only from the pricing core's perspective: every
//! evaluation function takes `&Catalog` explicitly. Mutations (price edits,
//! stock changes, coupon toggles) come from the external admin workflow via
//! the storefront's catalog store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coupon::Coupon;
use crate::types::{CategoryId, ProductId, ReviewId, ShopperId};

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub shopper_id: ShopperId,
    pub author: String,
    /// Star rating, 1-5.
    pub rating: u8,
    pub comment: String,
}

/// A sellable product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// URL-safe unique handle.
    pub slug: String,
    pub category_id: CategoryId,
    /// Current selling price (positive).
    pub price: Decimal,
    /// Pre-discount price for display, >= `price` when present.
    pub original_price: Option<Decimal>,
    /// Units available. Decremented only by fulfillment, which is outside
    /// this crate; cart clamping treats it as advisory.
    pub stock: u32,
    /// Ordered image URIs; non-empty for sellable products.
    pub images: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Mean of review ratings, 0 if there are none.
    #[must_use]
    pub fn rating(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        f64::from(sum) / self.reviews.len() as f64
    }

    /// Number of reviews.
    #[must_use]
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    /// First image, used as the cart/order thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A catalog category. Categories form a two-level tree: a category with a
/// `parent_id` must reference a root category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
}

/// Catalog validation failures surfaced when loading seed data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product id: {0}")]
    DuplicateProductId(ProductId),
    #[error("duplicate product slug: {0}")]
    DuplicateProductSlug(String),
    #[error("duplicate coupon code: {0}")]
    DuplicateCouponCode(String),
    #[error("product {0} has a non-positive price")]
    NonPositivePrice(ProductId),
    #[error("product {0} has an original price below its selling price")]
    OriginalPriceBelowPrice(ProductId),
    #[error("product {0} has no images")]
    NoImages(ProductId),
    #[error("product {0} references unknown category {1}")]
    UnknownCategory(ProductId, CategoryId),
    #[error("category {0} has a parent that is itself a sub-category")]
    NestedSubCategory(CategoryId),
    #[error("category {0} references unknown parent {1}")]
    UnknownParentCategory(CategoryId, CategoryId),
}

/// The product and coupon collections the pricing core reads from.
///
/// This is a plain context object, not a singleton: callers own it and pass
/// it by reference into evaluation functions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    coupons: Vec<Coupon>,
}

impl Catalog {
    /// Build a catalog, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] on duplicate ids/slugs/codes, non-positive
    /// prices, an `original_price` below `price`, a product without images,
    /// a dangling category reference, or a category tree deeper than two
    /// levels.
    pub fn new(
        products: Vec<Product>,
        categories: Vec<Category>,
        coupons: Vec<Coupon>,
    ) -> Result<Self, CatalogError> {
        for category in &categories {
            if let Some(parent_id) = category.parent_id {
                let parent = categories
                    .iter()
                    .find(|c| c.id == parent_id)
                    .ok_or(CatalogError::UnknownParentCategory(category.id, parent_id))?;
                if parent.parent_id.is_some() {
                    return Err(CatalogError::NestedSubCategory(category.id));
                }
            }
        }

        for (i, product) in products.iter().enumerate() {
            if products[..i].iter().any(|p| p.id == product.id) {
                return Err(CatalogError::DuplicateProductId(product.id));
            }
            if products[..i].iter().any(|p| p.slug == product.slug) {
                return Err(CatalogError::DuplicateProductSlug(product.slug.clone()));
            }
            if product.price <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice(product.id));
            }
            if let Some(original) = product.original_price {
                if original < product.price {
                    return Err(CatalogError::OriginalPriceBelowPrice(product.id));
                }
            }
            if product.images.is_empty() {
                return Err(CatalogError::NoImages(product.id));
            }
            if !categories.iter().any(|c| c.id == product.category_id) {
                return Err(CatalogError::UnknownCategory(product.id, product.category_id));
            }
        }

        for (i, coupon) in coupons.iter().enumerate() {
            if coupons[..i]
                .iter()
                .any(|c| c.code.eq_ignore_ascii_case(&coupon.code))
            {
                return Err(CatalogError::DuplicateCouponCode(coupon.code.clone()));
            }
        }

        Ok(Self {
            products,
            categories,
            coupons,
        })
    }

    /// All products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All categories.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All coupons, active or not.
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look up a product by slug.
    #[must_use]
    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Look up a coupon by its case-insensitive code.
    #[must_use]
    pub fn coupon_by_code(&self, code: &str) -> Option<&Coupon> {
        self.coupons
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Mutable product access for the external admin workflow.
    pub fn product_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Mutable coupon access for the external admin workflow.
    pub fn coupon_mut(&mut self, code: &str) -> Option<&mut Coupon> {
        self.coupons
            .iter_mut()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}
