//! List Favorites Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sorveteria_app::domain::favorites::records::FavoriteRecord;

use crate::{
    extensions::*,
    favorites::errors::into_status_error,
    pots::{CatalogRefResponse, refs_response},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FavoriteResponse {
    /// The unique identifier of the favorite
    pub uuid: Uuid,

    /// Name given by the customer
    pub name: String,

    /// Pot size
    pub size: String,

    /// Price when saved, in centavos
    pub price: u64,

    /// Flavors
    pub flavors: Vec<CatalogRefResponse>,

    /// Additionals
    pub additionals: Vec<CatalogRefResponse>,

    /// The date and time the favorite was saved
    pub created_at: String,
}

impl From<FavoriteRecord> for FavoriteResponse {
    fn from(record: FavoriteRecord) -> Self {
        let favorite = record.favorite;

        Self {
            uuid: record.uuid.into_uuid(),
            name: favorite.name,
            size: favorite.size.label().to_string(),
            price: favorite.price.minor_units(),
            flavors: refs_response(&favorite.flavors),
            additionals: refs_response(&favorite.additionals),
            created_at: record.created_at.to_string(),
        }
    }
}

/// Favorites Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FavoritesResponse {
    pub favorites: Vec<FavoriteResponse>,
}

/// List Favorites Handler
#[endpoint(
    tags("favorites"),
    summary = "List My Favorites",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<FavoritesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let favorites = state
        .app
        .favorites
        .list_favorites(principal.customer)
        .await
        .map_err(into_status_error)?;

    Ok(Json(FavoritesResponse {
        favorites: favorites.into_iter().map(Into::into).collect(),
    }))
}
