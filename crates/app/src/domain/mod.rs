//! Sorveteria Domain Concerns

pub mod catalog;
pub(crate) mod columns;
pub mod coupons;
pub mod customers;
pub mod favorites;
pub mod loyalty;
pub mod orders;
