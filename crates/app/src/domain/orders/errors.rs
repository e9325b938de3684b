//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::orders::checkout::CheckoutRejection;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    /// Field-level validation failed; nothing was mutated. Recoverable:
    /// the caller fixes the named fields and tries again.
    #[error("validation failed: {0}")]
    Rejected(CheckoutRejection),

    #[error("order already exists")]
    AlreadyExists,

    #[error("order or item not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    /// Cart mutation or checkout on an order that is no longer `pending`.
    #[error("order is no longer an open cart")]
    NotPending,

    /// Fulfillment on an order that is not `paid`.
    #[error("order has not been paid")]
    NotPaid,

    /// Cancellation of an order already in a terminal state.
    #[error("order is already complete or cancelled")]
    Terminal,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<CheckoutRejection> for OrdersServiceError {
    fn from(rejection: CheckoutRejection) -> Self {
        Self::Rejected(rejection)
    }
}
