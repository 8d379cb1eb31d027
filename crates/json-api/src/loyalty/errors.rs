//! Loyalty Errors

use salvo::http::StatusError;
use tracing::error;

use sorveteria_app::domain::loyalty::LoyaltyServiceError;

pub(crate) fn into_status_error(error: LoyaltyServiceError) -> StatusError {
    match error {
        LoyaltyServiceError::AlreadyExists => {
            StatusError::conflict().brief("Transaction already exists")
        }
        LoyaltyServiceError::NotFound => StatusError::not_found().brief("Customer not found"),
        LoyaltyServiceError::InvalidReference
        | LoyaltyServiceError::MissingRequiredData
        | LoyaltyServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid points adjustment")
        }
        LoyaltyServiceError::Points(reason) => StatusError::bad_request().brief(reason.to_string()),
        LoyaltyServiceError::Sql(source) => {
            error!("loyalty storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
