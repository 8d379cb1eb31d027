//! Favorite Errors

use salvo::http::StatusError;
use tracing::error;

use sorveteria_app::domain::favorites::FavoritesServiceError;

pub(crate) fn into_status_error(error: FavoritesServiceError) -> StatusError {
    match error {
        FavoritesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Favorite already exists")
        }
        FavoritesServiceError::NotFound => StatusError::not_found().brief("Favorite not found"),
        FavoritesServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown flavor or additional")
        }
        FavoritesServiceError::MissingRequiredData | FavoritesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid favorite payload")
        }
        FavoritesServiceError::Sql(source) => {
            error!("favorite storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
