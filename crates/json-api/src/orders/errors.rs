//! Errors

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use tracing::error;

use bazaar_app::orders::{CheckoutRejection, OrdersServiceError};

/// One field-level validation error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidationErrorResponse {
    /// Field the error is attached to
    pub field: String,

    /// Human-readable message
    pub message: String,
}

/// Flatten a rejection into per-field response entries.
pub(crate) fn field_errors(rejection: CheckoutRejection) -> Vec<ValidationErrorResponse> {
    rejection
        .errors
        .into_iter()
        .map(|error| ValidationErrorResponse {
            field: error.field.as_str().to_string(),
            message: error.message,
        })
        .collect()
}

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::Rejected(rejection) => {
            StatusError::unprocessable_entity().brief(format!("Validation failed: {rejection}"))
        }
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::NotPending => {
            StatusError::conflict().brief("Order is no longer an open cart")
        }
        OrdersServiceError::NotPaid => StatusError::conflict().brief("Order has not been paid"),
        OrdersServiceError::Terminal => {
            StatusError::conflict().brief("Order is already complete or cancelled")
        }
        OrdersServiceError::InvalidReference => StatusError::bad_request().brief("Unknown product"),
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::Sql(source) => {
            error!("orders storage error: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::NotFound => StatusError::not_found(),
    }
}
