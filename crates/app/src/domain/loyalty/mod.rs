//! Loyalty
//!
//! Balances live on the customer row; every change is also appended to the
//! transaction ledger in the same database transaction.

mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::LoyaltyServiceError;
pub use service::*;
