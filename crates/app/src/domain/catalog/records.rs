//! Catalog Records

use sorveteria::{
    pots::{AdditionalRef, FlavorRef},
    prices::Price,
};
use uuid::Uuid;

/// Flavor Record
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorRecord {
    pub uuid: Uuid,
    pub name: String,
    pub active: bool,
}

impl From<&FlavorRecord> for FlavorRef {
    fn from(record: &FlavorRecord) -> Self {
        FlavorRef {
            uuid: record.uuid,
            name: record.name.clone(),
        }
    }
}

/// Additional Record
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionalRecord {
    pub uuid: Uuid,
    pub name: String,
    pub price: Price,
    pub active: bool,
}

impl From<&AdditionalRecord> for AdditionalRef {
    fn from(record: &AdditionalRecord) -> Self {
        AdditionalRef {
            uuid: record.uuid,
            name: record.name.clone(),
        }
    }
}
