//! Delete Favorite Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, favorites::errors::into_status_error, state::State};

/// Delete Favorite Handler
#[endpoint(
    tags("favorites"),
    summary = "Delete Favorite",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Favorite deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Favorite not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    favorite: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .favorites
        .delete_favorite(principal.customer, favorite.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use sorveteria_app::domain::favorites::{
        FavoritesServiceError, MockFavoritesService, records::FavoriteUuid,
    };

    use crate::test_helpers::{TEST_CUSTOMER, TEST_CUSTOMER_UUID, TestServices};

    use super::*;

    fn make_service(favorites: MockFavoritesService) -> Service {
        TestServices {
            favorites,
            ..TestServices::default()
        }
        .serve(
            TEST_CUSTOMER,
            Router::with_path("favorites/{favorite}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_favorite_returns_204() -> TestResult {
        let uuid = FavoriteUuid::new();

        let mut favorites = MockFavoritesService::new();

        favorites
            .expect_delete_favorite()
            .once()
            .withf(move |customer, favorite| *customer == TEST_CUSTOMER_UUID && *favorite == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/favorites/{uuid}"))
            .send(&make_service(favorites))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_someone_elses_favorite_returns_404() -> TestResult {
        let mut favorites = MockFavoritesService::new();

        favorites
            .expect_delete_favorite()
            .once()
            .return_once(|_, _| Err(FavoritesServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/favorites/{}",
            FavoriteUuid::new()
        ))
        .send(&make_service(favorites))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
