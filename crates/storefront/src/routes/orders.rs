//! Order history and the admin fulfillment surface.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use lungi_mart_core::types::{OrderStatus, PaymentMethod, ProductId};
use lungi_mart_core::{Order, OrderItem};

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::cart::rupees;
use super::session::current_shopper;

/// Order line display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemView {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub quantity: u32,
    pub price: String,
    pub image: Option<String>,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            slug: item.slug.clone(),
            quantity: item.quantity,
            price: rupees(item.price),
            image: item.image.clone(),
        }
    }
}

/// Order display data.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: String,
    pub placed_at: DateTime<Utc>,
    pub customer_name: String,
    pub items: Vec<OrderItemView>,
    pub subtotal: String,
    pub discount: String,
    pub shipping_fee: String,
    pub total: String,
    pub coupon_code: Option<String>,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_str().to_owned(),
            placed_at: order.placed_at,
            customer_name: order.customer_name.clone(),
            items: order.items.iter().map(OrderItemView::from).collect(),
            subtotal: rupees(order.subtotal),
            discount: rupees(order.discount),
            shipping_fee: rupees(order.shipping_fee),
            total: rupees(order.total),
            coupon_code: order.coupon_code.clone(),
            status: order.status,
            payment_method: order.payment_method,
        }
    }
}

/// The signed-in shopper's order history.
#[instrument(skip(state, session))]
pub async fn list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<OrderView>>> {
    let shopper = current_shopper(&state, &session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("sign in to view your orders".to_string()))?;
    let orders = state.orders().for_shopper(shopper.id).await;
    Ok(Json(orders.iter().map(OrderView::from).collect()))
}

/// Show one order. Owner-only: someone else's order number behaves exactly
/// like an unknown one.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Json<OrderView>> {
    let shopper = current_shopper(&state, &session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("sign in to view your orders".to_string()))?;
    let order = state
        .orders()
        .get(&id)
        .await
        .filter(|o| o.shopper_id == shopper.id)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(OrderView::from(&order)))
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusForm {
    pub status: OrderStatus,
}

/// Advance an order's status (admin fulfillment caller).
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(form): Json<UpdateStatusForm>,
) -> Result<Json<OrderView>> {
    let order = state.orders().update_status(&id, form.status).await?;
    Ok(Json(OrderView::from(&order)))
}
