//! Favorite Records

use jiff::Timestamp;
use sorveteria::favorites::FavoritePot;

use crate::{domain::customers::records::CustomerUuid, uuids::TypedUuid};

/// Favorite UUID
pub type FavoriteUuid = TypedUuid<FavoriteRecord>;

/// Favorite Record
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteRecord {
    pub uuid: FavoriteUuid,
    pub customer_uuid: CustomerUuid,
    pub favorite: FavoritePot,
    pub created_at: Timestamp,
}
