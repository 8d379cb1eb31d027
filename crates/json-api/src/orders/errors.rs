//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use sorveteria::{
    coupons::CouponError,
    orders::{AssemblyError, StatusError as OrderStatusError},
};
use sorveteria_app::domain::orders::OrdersServiceError;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown flavor or additional")
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Assembly(AssemblyError::Coupon(CouponError::NotFound)) => {
            StatusError::not_found().brief("Coupon not found")
        }
        OrdersServiceError::Assembly(reason) => StatusError::bad_request().brief(reason.to_string()),
        OrdersServiceError::Status(OrderStatusError::InvalidStatus(label)) => {
            StatusError::bad_request()
                .brief("Invalid order status")
                .detail(label)
        }
        OrdersServiceError::Status(reason) => StatusError::bad_request().brief(reason.to_string()),
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
