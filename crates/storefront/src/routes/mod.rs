//! Route handlers for the storefront REST API.

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;
pub mod session;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Assemble all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/{slug}", get(products::show))
        .route("/products/{slug}/coupons", get(products::coupons))
        .route("/categories", get(products::categories))
        .route("/cart", get(cart::show).delete(cart::clear))
        .route("/cart/items", post(cart::add).patch(cart::update))
        .route("/cart/items/{product_id}", delete(cart::remove))
        .route(
            "/cart/coupon",
            post(cart::apply_coupon).delete(cart::remove_coupon),
        )
        .route("/checkout", post(checkout::place))
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", post(orders::update_status))
        .route("/session", post(session::login).delete(session::logout))
}
