//! External service integrations.

pub mod payment;

pub use payment::{MockPaymentGateway, PaymentError, PaymentGateway};
