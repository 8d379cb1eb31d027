//! Cart
//!
//! The cart is the client-owned scratch aggregate a customer builds pot by pot
//! before checking out. It is not an order: nothing in it is trusted at
//! checkout, and the cached coupon is dropped whenever the subtotal can change.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    coupons::{CouponCode, PendingDiscount},
    orders::CheckoutRequest,
    pots::Pot,
    prices::Price,
    pricing::{PricingError, subtotal_price},
};

pub mod session;
pub mod storage;

pub use session::CartSession;
pub use storage::{CartStorage, CartStorageError, FileCartStorage, MemoryCartStorage, SessionKey};

/// Scratch copy of the customer's contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Contact email
    #[serde(default)]
    pub email: String,

    /// Delivery address
    #[serde(default)]
    pub address: String,
}

/// Pots selected so far, plus the last coupon validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pots: Vec<Pot>,
    #[serde(default)]
    applied_coupon: Option<PendingDiscount>,
    #[serde(default)]
    customer: CustomerSnapshot,
    started_at: Timestamp,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new(started_at: Timestamp) -> Self {
        Self {
            pots: Vec::new(),
            applied_coupon: None,
            customer: CustomerSnapshot::default(),
            started_at,
        }
    }

    /// Appends a pot.
    pub fn add_pot(&mut self, pot: Pot) {
        self.pots.push(pot);
        self.applied_coupon = None;
    }

    /// Mutates the most recently added pot in place.
    ///
    /// Returns `false` when the cart is empty. The cached coupon is dropped if
    /// the pot's price changed.
    pub fn edit_last_pot(&mut self, edit: impl FnOnce(&mut Pot)) -> bool {
        let Some(pot) = self.pots.last_mut() else {
            return false;
        };

        let before = pot.unit_price();

        edit(pot);

        if pot.unit_price() != before {
            self.applied_coupon = None;
        }

        true
    }

    /// Removes the pot at `index`, shifting later pots down.
    ///
    /// Out-of-range indices are ignored.
    pub fn remove_pot(&mut self, index: usize) -> Option<Pot> {
        if index >= self.pots.len() {
            return None;
        }

        self.applied_coupon = None;

        Some(self.pots.remove(index))
    }

    /// Empties the cart and drops any applied coupon.
    pub fn clear(&mut self) {
        self.pots.clear();
        self.applied_coupon = None;
    }

    /// Caches a coupon validation outcome.
    pub fn apply_coupon(&mut self, discount: PendingDiscount) {
        self.applied_coupon = Some(discount);
    }

    /// Drops the cached coupon.
    pub fn remove_coupon(&mut self) -> Option<PendingDiscount> {
        self.applied_coupon.take()
    }

    /// Replaces the customer snapshot.
    pub fn set_customer(&mut self, customer: CustomerSnapshot) {
        self.customer = customer;
    }

    /// Selected pots, in order.
    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    /// Returns true if no pots are selected.
    pub fn is_empty(&self) -> bool {
        self.pots.is_empty()
    }

    /// Cached coupon outcome, if any.
    pub fn applied_coupon(&self) -> Option<&PendingDiscount> {
        self.applied_coupon.as_ref()
    }

    /// Code of the cached coupon, if any.
    pub fn coupon_code(&self) -> Option<&CouponCode> {
        self.applied_coupon.as_ref().map(|pending| &pending.code)
    }

    /// Customer snapshot.
    pub fn customer(&self) -> &CustomerSnapshot {
        &self.customer
    }

    /// When the cart was started.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Pre-discount total of the selected pots.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the total cannot be represented.
    pub fn subtotal(&self) -> Result<Price, PricingError> {
        subtotal_price(&self.pots)
    }

    /// Builds a checkout request delivering to the snapshot address.
    ///
    /// Only the coupon code is carried over; the discount is recomputed at checkout.
    pub fn checkout_request(&self, payment_method: impl Into<String>) -> CheckoutRequest {
        CheckoutRequest {
            pots: self.pots.clone(),
            coupon_code: self.coupon_code().cloned(),
            payment_method: payment_method.into(),
            delivery_address: self.customer.address.clone(),
        }
    }
}
