//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Validation failures (coupon
//! rejections, checkout preconditions) are user-facing messages, not system
//! failures, and are never captured. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use lungi_mart_core::{CartError, CouponRejection, PlaceOrderError};

use crate::services::PaymentError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Cart mutation rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Coupon rejected by the evaluator.
    #[error("Coupon rejected: {0}")]
    Coupon(#[from] CouponRejection),

    /// Checkout precondition failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] PlaceOrderError),

    /// Payment gateway failed. Distinct from other failures so the UI can
    /// offer a manual retry.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Internal(_) | Self::Session(_))
            || matches!(self, Self::Store(ref e) if is_server_store_error(e))
        {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Internal(_) | Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Payment(_) => StatusCode::BAD_GATEWAY,
            Self::Cart(_) | Self::Coupon(_) | Self::Checkout(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(err) => match err {
                StoreError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::IllegalTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) | Self::Session(_) => "Internal server error".to_string(),
            Self::Store(err) => match err {
                StoreError::OrderNotFound(id) => format!("order {id} not found"),
                StoreError::IllegalTransition { .. } => err.to_string(),
                _ => "Internal server error".to_string(),
            },
            Self::Payment(err) => format!("{err}; please retry"),
            Self::Cart(err) => err.to_string(),
            Self::Coupon(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Store errors that indicate a broken server, as opposed to a bad request.
const fn is_server_store_error(err: &StoreError) -> bool {
    !matches!(
        err,
        StoreError::OrderNotFound(_) | StoreError::IllegalTransition { .. }
    )
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
