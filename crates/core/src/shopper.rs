//! The current-shopper collaborator.
//!
//! Authentication itself is external; the core only needs a nullable
//! profile with a birthday (for birthday-triggered coupons) and a set of
//! shipping addresses (for checkout preconditions).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{AddressId, ShopperId};

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub label: String,
    pub line1: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
}

/// The logged-in shopper's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shopper {
    pub id: ShopperId,
    pub name: String,
    /// Date of birth; only (month, day) matter for birthday coupons.
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl Shopper {
    /// Look up a saved address by id.
    #[must_use]
    pub fn address(&self, id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }
}
