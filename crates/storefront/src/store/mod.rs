//! In-memory stores seeded from JSON.
//!
//! Persistence engines are out of scope for the storefront: the catalog is
//! loaded once from a seed file and mutated in place by the external admin
//! workflow, and placed orders live in memory for the process lifetime.

pub mod catalog;
pub mod orders;

pub use catalog::CatalogStore;
pub use orders::OrderStore;

use lungi_mart_core::catalog::CatalogError;
use lungi_mart_core::types::OrderStatus;
use thiserror::Error;

/// Store-level failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read seed data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("order not found: {0}")]
    OrderNotFound(String),
    #[error("order status cannot move from {from} to {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },
}
