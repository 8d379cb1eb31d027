//! Coupon Errors

use salvo::http::StatusError;
use tracing::error;

use sorveteria::coupons::CouponError;
use sorveteria_app::domain::coupons::CouponsServiceError;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Coupon already exists")
        }
        CouponsServiceError::NotFound | CouponsServiceError::Inapplicable(CouponError::NotFound) => {
            StatusError::not_found().brief("Coupon not found")
        }
        CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid coupon payload")
        }
        CouponsServiceError::Definition(source) => StatusError::bad_request()
            .brief("Invalid coupon definition")
            .detail(source.to_string()),
        CouponsServiceError::Inapplicable(reason) => {
            StatusError::bad_request().brief(reason.to_string())
        }
        CouponsServiceError::Sql(source) => {
            error!("coupon storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use sorveteria::prices::Price;

    use super::*;

    #[test]
    fn inactive_or_missing_coupon_is_not_found() {
        let status = into_status_error(CouponsServiceError::Inapplicable(CouponError::NotFound));

        assert_eq!(status.code, StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_coupon_failures_are_bad_requests() {
        for reason in [
            CouponError::Expired,
            CouponError::UsageExceeded,
            CouponError::BelowMinimum {
                minimum: Price::new(5_000),
            },
        ] {
            let status = into_status_error(CouponsServiceError::Inapplicable(reason));

            assert_eq!(status.code, StatusCode::BAD_REQUEST);
        }
    }
}
