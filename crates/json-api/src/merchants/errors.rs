//! Errors

use salvo::http::StatusError;
use tracing::error;

use bazaar_app::merchants::MerchantsServiceError;

pub(crate) fn into_status_error(error: MerchantsServiceError) -> StatusError {
    match error {
        MerchantsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Merchant already exists")
        }
        MerchantsServiceError::MissingRequiredData => {
            StatusError::bad_request().brief("Invalid merchant payload")
        }
        MerchantsServiceError::Sql(source) => {
            error!("merchants storage error: {source}");

            StatusError::internal_server_error()
        }
        MerchantsServiceError::NotFound => StatusError::not_found(),
    }
}
