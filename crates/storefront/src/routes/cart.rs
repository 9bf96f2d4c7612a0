//! Cart route handlers.
//!
//! The cart lives in the session and is re-priced on every read: the
//! handlers load it, mutate it through the core's clamped operations, save
//! it back and return the freshly quoted view. The applied coupon is
//! resolved against the live catalog on each pass, so its cart-dependent
//! rules (minimum purchase, product scope) are re-validated exactly as the
//! pricing core specifies.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use lungi_mart_core::types::{CurrencyCode, Price, ProductId};
use lungi_mart_core::{Cart, Catalog, coupon, pricing};

use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

use super::session::current_shopper;

/// Format a rupee amount for display.
pub(crate) fn rupees(amount: Decimal) -> String {
    Price::new(amount, CurrencyCode::INR).display()
}

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub slug: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    pub image: Option<String>,
}

/// Pricing display data.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    pub subtotal: String,
    pub discount: String,
    pub total: String,
    pub shipping_fee: String,
    pub order_total: String,
    pub currency: &'static str,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: u32,
    pub applied_coupon: Option<String>,
    pub quote: QuoteView,
}

impl CartView {
    /// Price the cart against the current catalog and build the view.
    pub(crate) fn build(cart: &Cart, catalog: &Catalog) -> Self {
        let applied = cart
            .applied_coupon()
            .and_then(|code| catalog.coupon_by_code(code));
        let quote = pricing::quote(cart, applied);

        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product_id,
                    slug: item.slug.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: rupees(item.price),
                    line_total: rupees(item.line_total()),
                    image: item.image.clone(),
                })
                .collect(),
            count: cart.count(),
            applied_coupon: cart.applied_coupon().map(str::to_owned),
            quote: QuoteView {
                subtotal: rupees(quote.subtotal),
                discount: rupees(quote.discount),
                total: rupees(quote.total),
                shipping_fee: rupees(quote.shipping_fee),
                order_total: rupees(quote.order_total),
                currency: quote.currency.code(),
            },
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: i64,
}

/// Apply coupon form data.
#[derive(Debug, Deserialize)]
pub struct ApplyCouponForm {
    pub code: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session cart, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Save the cart back to the session.
pub(crate) async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Display the priced cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = load_cart(&session).await?;
    let catalog = state.catalog().read().await;
    Ok(Json(CartView::build(&cart, &catalog)))
}

/// Add a product to the cart.
///
/// An already-present product has its quantity incremented; the result is
/// clamped to the product's stock. Zero-stock products are rejected.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    let catalog = state.catalog().read().await;
    let product = catalog
        .product(ProductId::new(form.product_id))
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    cart.add(product, form.quantity.unwrap_or(1))?;
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &catalog)))
}

/// Set a line's quantity. Zero or negative removes the line; unknown
/// products are a silent no-op.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.update_quantity(ProductId::new(form.product_id), form.quantity);
    save_cart(&session, &cart).await?;
    let catalog = state.catalog().read().await;
    Ok(Json(CartView::build(&cart, &catalog)))
}

/// Remove a line. Idempotent.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(product_id): Path<i32>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.remove(ProductId::new(product_id));
    save_cart(&session, &cart).await?;
    let catalog = state.catalog().read().await;
    Ok(Json(CartView::build(&cart, &catalog)))
}

/// Empty the cart, dropping any applied coupon with it.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    let catalog = state.catalog().read().await;
    Ok(Json(CartView::build(&cart, &catalog)))
}

/// Validate and attach a coupon code.
///
/// Runs the full evaluation sequence against the current cart, shopper and
/// order history. On success the coupon replaces any previously applied
/// one; a cart never holds two.
#[instrument(skip(state, session))]
pub async fn apply_coupon(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ApplyCouponForm>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    let shopper = current_shopper(&state, &session).await?;
    let history = match &shopper {
        Some(s) => state.orders().for_shopper(s.id).await,
        None => Vec::new(),
    };

    let catalog = state.catalog().read().await;
    let accepted = coupon::evaluate(
        &form.code,
        &cart,
        shopper.as_ref(),
        &history,
        &catalog,
        Utc::now().date_naive(),
    )?;

    cart.set_applied_coupon(accepted.code.clone());
    save_cart(&session, &cart).await?;
    Ok(Json(CartView::build(&cart, &catalog)))
}

/// Detach the applied coupon unconditionally.
#[instrument(skip(state, session))]
pub async fn remove_coupon(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await?;
    cart.clear_coupon();
    save_cart(&session, &cart).await?;
    let catalog = state.catalog().read().await;
    Ok(Json(CartView::build(&cart, &catalog)))
}
