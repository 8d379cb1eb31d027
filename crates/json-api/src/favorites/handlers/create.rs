//! Save Favorite Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sorveteria::favorites::FavoritePot;

use crate::{
    extensions::*,
    favorites::{errors::into_status_error, handlers::index::FavoriteResponse},
    pots::{PotRequest, resolve_pots},
    state::State,
};

/// Save Favorite Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateFavoriteRequest {
    /// Name for the saved pot
    pub name: String,

    /// Pot size (`pequeno`, `medio` or `grande`)
    pub size: String,

    /// Flavor identifiers
    #[serde(default)]
    pub flavors: Vec<Uuid>,

    /// Additional identifiers
    #[serde(default)]
    pub additionals: Vec<Uuid>,
}

/// Save Favorite Handler
#[endpoint(
    tags("favorites"),
    summary = "Save Favorite",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Favorite saved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateFavoriteRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<FavoriteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let CreateFavoriteRequest {
        name,
        size,
        flavors,
        additionals,
    } = json.into_inner();

    let pot_request = PotRequest {
        size,
        flavors,
        additionals,
    };

    let pots = resolve_pots(state.app.catalog.as_ref(), &[pot_request]).await?;
    let pot = pots
        .first()
        .ok_or_else(|| StatusError::bad_request().brief("A pot is required"))?;

    let favorite = FavoritePot::from_pot(&name, pot).or_400("Invalid favorite")?;

    let record = state
        .app
        .favorites
        .create_favorite(principal.customer, favorite)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/favorites/{}", record.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(record.into()))
}
