//! Session-related types.
//!
//! The session is the per-shopper scoped store: it carries the cart (with
//! its applied coupon) and the mock login. It survives page reloads; the
//! cart key is reset after a successful checkout and the whole session is
//! flushed on logout.

/// Session keys for per-shopper state.
pub mod keys {
    /// Key for the serialized cart (line items plus applied coupon).
    pub const CART: &str = "cart";

    /// Key for the logged-in shopper's id (mock authentication).
    pub const CURRENT_SHOPPER: &str = "current_shopper";
}
