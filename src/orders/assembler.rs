//! Order assembly
//!
//! Turns a checkout request into an [`OrderDraft`]: everything an order row
//! and its join rows need, priced from the pots and with any coupon
//! re-validated against that price.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    coupons::{ConfirmedDiscount, Coupon, CouponCode, CouponError},
    orders::{InitialStatus, OrderStatus},
    pots::{AdditionalRef, FlavorRef, Pot, RefSet},
    prices::Price,
    pricing::{PricingError, subtotal_price},
};

/// Separator between pot sizes in an order's size label.
pub const SIZE_LABEL_SEPARATOR: &str = " | ";

/// Errors assembling an order.
#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    /// No pots were selected.
    #[error("an order needs at least one pot")]
    EmptyPots,

    /// The payment method is blank.
    #[error("payment method is required")]
    MissingPaymentMethod,

    /// The delivery address is blank.
    #[error("delivery address is required")]
    MissingDeliveryAddress,

    /// The coupon could not be applied.
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// The order total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// What a customer submits at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Pots to order
    pub pots: Vec<Pot>,

    /// Coupon to apply, if any
    #[serde(default)]
    pub coupon_code: Option<CouponCode>,

    /// How the customer pays
    pub payment_method: String,

    /// Where to deliver
    pub delivery_address: String,
}

impl CheckoutRequest {
    /// Checks the required fields.
    ///
    /// # Errors
    ///
    /// Returns the first missing field as an [`AssemblyError`].
    pub fn check(&self) -> Result<(), AssemblyError> {
        if self.pots.is_empty() {
            return Err(AssemblyError::EmptyPots);
        }

        if self.payment_method.trim().is_empty() {
            return Err(AssemblyError::MissingPaymentMethod);
        }

        if self.delivery_address.trim().is_empty() {
            return Err(AssemblyError::MissingDeliveryAddress);
        }

        Ok(())
    }
}

/// A priced order ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    size_label: String,
    flavors: RefSet<FlavorRef>,
    additionals: RefSet<AdditionalRef>,
    subtotal: Price,
    discount: Option<ConfirmedDiscount>,
    payment_method: String,
    delivery_address: String,
    status: OrderStatus,
    created_at: Timestamp,
}

impl OrderDraft {
    /// Size labels of every pot, joined.
    pub fn size_label(&self) -> &str {
        &self.size_label
    }

    /// Distinct flavors across all pots.
    pub fn flavors(&self) -> &RefSet<FlavorRef> {
        &self.flavors
    }

    /// Distinct additionals across all pots.
    pub fn additionals(&self) -> &RefSet<AdditionalRef> {
        &self.additionals
    }

    /// Pre-discount total.
    pub fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// Confirmed coupon discount, if one applied.
    pub fn discount(&self) -> Option<&ConfirmedDiscount> {
        self.discount.as_ref()
    }

    /// Code of the applied coupon.
    pub fn coupon_code(&self) -> Option<&CouponCode> {
        self.discount.as_ref().map(ConfirmedDiscount::code)
    }

    /// Discount taken off the subtotal.
    pub fn discount_value(&self) -> Price {
        self.discount
            .as_ref()
            .map_or(Price::ZERO, ConfirmedDiscount::applied)
    }

    /// Amount payable.
    pub fn total(&self) -> Price {
        self.subtotal.saturating_sub(self.discount_value())
    }

    /// Payment method.
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    /// Delivery address.
    pub fn delivery_address(&self) -> &str {
        &self.delivery_address
    }

    /// Status at creation.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Joins the size labels of `pots` in order.
pub fn size_label(pots: &[Pot]) -> String {
    pots.iter()
        .map(|pot| pot.size().label())
        .collect::<Vec<_>>()
        .join(SIZE_LABEL_SEPARATOR)
}

/// Assembles an order from a checkout request.
///
/// `coupon` is the result of looking up `request.coupon_code`; it is ignored
/// when the request carries no code. The discount is always recomputed against
/// the subtotal of `request.pots`. A coupon that ends up taking nothing off is
/// not recorded on the order.
///
/// # Errors
///
/// - [`AssemblyError::EmptyPots`], [`AssemblyError::MissingPaymentMethod`],
///   [`AssemblyError::MissingDeliveryAddress`]: required input is missing.
/// - [`AssemblyError::Coupon`]: the requested coupon cannot be applied.
/// - [`AssemblyError::Pricing`]: the subtotal cannot be represented.
pub fn assemble(
    request: &CheckoutRequest,
    coupon: Option<&Coupon>,
    initial: InitialStatus,
    now: Timestamp,
) -> Result<OrderDraft, AssemblyError> {
    request.check()?;

    let subtotal = subtotal_price(&request.pots)?;

    let discount = match &request.coupon_code {
        Some(code) => {
            let coupon = coupon.filter(|coupon| &coupon.code == code);

            Some(ConfirmedDiscount::confirm(coupon, subtotal, now)?)
                .filter(|confirmed| !confirmed.applied().is_zero())
        }
        None => None,
    };

    let mut flavors = RefSet::new();
    let mut additionals = RefSet::new();

    for pot in &request.pots {
        flavors.merge(pot.flavors());
        additionals.merge(pot.additionals());
    }

    Ok(OrderDraft {
        size_label: size_label(&request.pots),
        flavors,
        additionals,
        subtotal,
        discount,
        payment_method: request.payment_method.trim().to_string(),
        delivery_address: request.delivery_address.trim().to_string(),
        status: initial.status(),
        created_at: now,
    })
}
