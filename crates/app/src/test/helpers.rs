//! Test Helpers

use sorveteria::{orders::CheckoutRequest, pots::Pot};

/// Checkout for `pots` paid by pix, without a coupon.
pub(crate) fn checkout(pots: Vec<Pot>) -> CheckoutRequest {
    CheckoutRequest {
        pots,
        coupon_code: None,
        payment_method: "pix".to_string(),
        delivery_address: "Rua das Flores, 10".to_string(),
    }
}
