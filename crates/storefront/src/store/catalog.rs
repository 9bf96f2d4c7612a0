//! The catalog store: products, categories and coupons behind a read-write
//! lock.
//!
//! Reads vastly outnumber writes; the pricing core takes a read guard for
//! the duration of one evaluation so a single pricing pass always sees a
//! consistent catalog.

use std::path::Path;

use serde::Deserialize;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use lungi_mart_core::{Catalog, Category, Coupon, Product, Shopper};

use super::StoreError;

/// Shape of the seed JSON file.
#[derive(Debug, Deserialize)]
struct SeedFile {
    products: Vec<Product>,
    categories: Vec<Category>,
    coupons: Vec<Coupon>,
    /// Mock shopper profiles; real authentication is an external concern.
    #[serde(default)]
    shoppers: Vec<Shopper>,
}

/// In-memory catalog guarded by a read-write lock.
pub struct CatalogStore {
    inner: RwLock<Catalog>,
}

impl CatalogStore {
    /// Wrap an already-validated catalog.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: RwLock::new(catalog),
        }
    }

    /// Load and validate the seed file, returning the store plus the mock
    /// shopper profiles it carries.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed, or if
    /// the catalog fails invariant validation.
    pub fn load(path: &Path) -> Result<(Self, Vec<Shopper>), StoreError> {
        let raw = std::fs::read_to_string(path)?;
        let seed: SeedFile = serde_json::from_str(&raw)?;
        let catalog = Catalog::new(seed.products, seed.categories, seed.coupons)?;
        Ok((Self::new(catalog), seed.shoppers))
    }

    /// Take a read guard on the catalog.
    pub async fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.inner.read().await
    }

    /// Take a write guard, for admin-workflow mutations.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.inner.write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_file_parses_products_coupons_and_shoppers() {
        let raw = r#"{
            "products": [{
                "id": 1,
                "name": "Classic Checked Lungi",
                "slug": "classic-checked-lungi",
                "category_id": 1,
                "price": "499",
                "stock": 5,
                "images": ["/images/classic.jpg"]
            }],
            "categories": [{"id": 1, "name": "Lungis", "slug": "lungis"}],
            "coupons": [{
                "id": 1,
                "code": "LUNGIKING",
                "description": "Flat 150 off the Classic",
                "discount": {"type": "fixed", "value": "150"},
                "applicable_product_ids": [1],
                "is_active": true
            }],
            "shoppers": [{"id": 1, "name": "Muthu", "birthday": "1990-05-15"}]
        }"#;
        let seed: SeedFile = serde_json::from_str(raw).expect("parse seed");
        let catalog =
            Catalog::new(seed.products, seed.categories, seed.coupons).expect("valid catalog");
        assert!(catalog.coupon_by_code("lungiking").is_some());
        assert_eq!(seed.shoppers.len(), 1);
    }
}
