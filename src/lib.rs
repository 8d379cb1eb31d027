//! Sorveteria
//!
//! Order and promotions engine for a build-your-own ice-cream shop: carts of
//! pots, coupon validation, order assembly with a configurable status machine,
//! loyalty point adjustments and saved favorites.

pub mod cart;
pub mod coupons;
pub mod favorites;
pub mod loyalty;
pub mod orders;
pub mod pots;
pub mod prelude;
pub mod prices;
pub mod pricing;
