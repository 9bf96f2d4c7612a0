//! The order store: placed orders plus the order-number sequence.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use lungi_mart_core::types::{OrderStatus, ProductId, ShopperId};
use lungi_mart_core::{Order, OrderNumber};

use super::StoreError;

/// In-memory collection of placed orders.
///
/// Order numbers come from a strictly increasing sequence, so two checkouts
/// racing through the same instant can never collide. Sequence gaps (from
/// checkouts that failed after number reservation) are harmless.
pub struct OrderStore {
    orders: RwLock<Vec<Order>>,
    sequence: AtomicU64,
}

impl OrderStore {
    /// An empty store with the sequence starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
            sequence: AtomicU64::new(1),
        }
    }

    /// A store pre-populated with existing orders; the sequence resumes
    /// past the highest existing suffix.
    #[must_use]
    pub fn with_orders(orders: Vec<Order>) -> Self {
        let next = orders
            .iter()
            .filter_map(|o| o.id.suffix())
            .max()
            .map_or(1, |max| max + 1);
        Self {
            orders: RwLock::new(orders),
            sequence: AtomicU64::new(next),
        }
    }

    /// Reserve the next order number.
    pub fn next_order_number(&self) -> OrderNumber {
        OrderNumber::from_sequence(self.sequence.fetch_add(1, Ordering::Relaxed))
    }

    /// Append a placed order.
    pub async fn append(&self, order: Order) {
        self.orders.write().await.push(order);
    }

    /// Look up an order by its number.
    pub async fn get(&self, id: &str) -> Option<Order> {
        self.orders
            .read()
            .await
            .iter()
            .find(|o| o.id.as_str() == id)
            .cloned()
    }

    /// A shopper's order history, oldest first.
    pub async fn for_shopper(&self, shopper_id: ShopperId) -> Vec<Order> {
        self.orders
            .read()
            .await
            .iter()
            .filter(|o| o.shopper_id == shopper_id)
            .cloned()
            .collect()
    }

    /// Advance an order's status (admin fulfillment workflow).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] for an unknown number and
    /// [`StoreError::IllegalTransition`] when `to` is not the immediate
    /// next step in the linear progression.
    pub async fn update_status(&self, id: &str, to: OrderStatus) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id.as_str() == id)
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))?;
        if !order.status.can_transition_to(to) {
            return Err(StoreError::IllegalTransition {
                from: order.status,
                to,
            });
        }
        order.status = to;
        Ok(order.clone())
    }

    /// Record a product review against an order (gates the review UI).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::OrderNotFound`] for an unknown number.
    pub async fn mark_reviewed(
        &self,
        id: &str,
        product_id: ProductId,
    ) -> Result<Order, StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .iter_mut()
            .find(|o| o.id.as_str() == id)
            .ok_or_else(|| StoreError::OrderNotFound(id.to_string()))?;
        order.mark_reviewed(product_id);
        Ok(order.clone())
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
