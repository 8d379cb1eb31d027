//! Catalog
//!
//! Flavors and additionals are maintained outside this application; they are
//! only ever read here.

mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
