//! Checkout: freeze the session cart into an order.

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use lungi_mart_core::order::place_order;
use lungi_mart_core::types::{AddressId, CurrencyCode, PaymentMethod, Price};
use lungi_mart_core::{Cart, pricing};

use crate::error::Result;
use crate::state::AppState;

use super::cart::{load_cart, rupees, save_cart};
use super::orders::OrderView;
use super::session::current_shopper;

/// Checkout form data.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub address_id: i32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Checkout response: the frozen order plus the payment reference.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order: OrderView,
    pub payment_reference: String,
}

/// Place an order from the session cart.
///
/// Holds the catalog write guard across stock validation and decrement, so
/// two racing checkouts cannot both claim the last unit. The session cart
/// is cleared only after the payment succeeds and the order is stored; any
/// failure leaves the cart exactly as it was.
#[instrument(skip(state, session))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<CheckoutResponse>)> {
    let cart = load_cart(&session).await?;
    let shopper = current_shopper(&state, &session).await?;

    let mut catalog = state.catalog().write().await;
    let applied = cart
        .applied_coupon()
        .and_then(|code| catalog.coupon_by_code(code))
        .cloned();
    let quote = pricing::quote(&cart, applied.as_ref());

    let order = place_order(
        &cart,
        &quote,
        shopper.as_ref(),
        Some(AddressId::new(form.address_id)),
        form.payment_method,
        &catalog,
        state.orders().next_order_number(),
        Utc::now(),
    )?;

    let confirmation = state
        .payments()
        .charge(Price::new(quote.order_total, CurrencyCode::INR))?;

    for item in &order.items {
        if let Some(product) = catalog.product_mut(item.product_id) {
            product.stock = product.stock.saturating_sub(item.quantity);
        }
    }
    drop(catalog);

    info!(
        order = %order.id,
        total = %rupees(order.total),
        payment = %confirmation.reference,
        "order placed"
    );

    let view = OrderView::from(&order);
    state.orders().append(order).await;
    save_cart(&session, &Cart::new()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order: view,
            payment_reference: confirmation.reference,
        }),
    ))
}
