//! Payment gateway seam.
//!
//! The core hands the gateway an amount and receives a single
//! success/failure signal back; the charge protocol itself is an external
//! concern. The seam exists so checkout stays atomic: a failed charge
//! leaves the session cart untouched and the caller may retry manually.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use lungi_mart_core::types::Price;

/// Gateway failures. The core never retries these automatically.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment gateway declined the charge")]
    Declined,
    #[error("payment gateway unreachable")]
    Unreachable,
}

/// Proof of a completed charge.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub reference: String,
}

/// The single signal the core needs from a payment provider.
pub trait PaymentGateway: Send + Sync {
    /// Charge the given amount.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError`] when the charge does not complete.
    fn charge(&self, amount: Price) -> Result<PaymentConfirmation, PaymentError>;
}

/// A gateway that approves every charge. Stands in for the real provider
/// in development and tests.
#[derive(Debug, Default)]
pub struct MockPaymentGateway {
    counter: AtomicU64,
}

impl PaymentGateway for MockPaymentGateway {
    fn charge(&self, amount: Price) -> Result<PaymentConfirmation, PaymentError> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        tracing::info!(amount = %amount.display(), "mock gateway approved charge");
        Ok(PaymentConfirmation {
            reference: format!("PAY-{n:08}"),
        })
    }
}
