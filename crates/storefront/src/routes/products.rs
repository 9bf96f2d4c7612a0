//! Product and category browsing.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lungi_mart_core::types::{CategoryId, ProductId};
use lungi_mart_core::{Coupon, Product, coupon};

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::cart::rupees;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category_id: CategoryId,
    pub price: String,
    pub original_price: Option<String>,
    pub stock: u32,
    pub in_stock: bool,
    pub rating: f64,
    pub review_count: usize,
    pub images: Vec<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            slug: product.slug.clone(),
            category_id: product.category_id,
            price: rupees(product.price),
            original_price: product.original_price.map(rupees),
            stock: product.stock,
            in_stock: product.stock > 0,
            rating: product.rating(),
            review_count: product.review_count(),
            images: product.images.clone(),
        }
    }
}

/// Coupon display data, as shown on a product page.
#[derive(Debug, Clone, Serialize)]
pub struct CouponView {
    pub code: String,
    pub description: String,
}

impl From<&Coupon> for CouponView {
    fn from(c: &Coupon) -> Self {
        Self {
            code: c.code.clone(),
            description: c.description.clone(),
        }
    }
}

/// Product listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Category slug to filter by.
    pub category: Option<String>,
}

/// List products, optionally filtered to one category.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let catalog = state.catalog().read().await;

    let category_id = match &query.category {
        Some(slug) => Some(
            catalog
                .categories()
                .iter()
                .find(|c| c.slug == *slug)
                .map(|c| c.id)
                .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?,
        ),
        None => None,
    };

    let views = catalog
        .products()
        .iter()
        .filter(|p| category_id.is_none_or(|id| p.category_id == id))
        .map(ProductView::from)
        .collect();
    Ok(Json(views))
}

/// Show one product by slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductView>> {
    let catalog = state.catalog().read().await;
    let product = catalog
        .product_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;
    Ok(Json(ProductView::from(product)))
}

/// Active coupons that cover this product, for the product-page teaser.
#[instrument(skip(state))]
pub async fn coupons(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<CouponView>>> {
    let catalog = state.catalog().read().await;
    let product = catalog
        .product_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;
    let views = coupon::eligible_for_product(&catalog, product.id)
        .into_iter()
        .map(CouponView::from)
        .collect();
    Ok(Json(views))
}

/// List all categories.
#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<lungi_mart_core::Category>>> {
    let catalog = state.catalog().read().await;
    Ok(Json(catalog.categories().to_vec()))
}
