//! Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::orders::{CheckoutFields, OrdersServiceError};

use crate::{
    extensions::*,
    orders::errors::{ValidationErrorResponse, field_errors, into_status_error},
    orders::handlers::get::OrderResponse,
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    pub email: String,
    pub address: String,
    pub cc_name: String,
    pub cc_num: String,
    pub cvv: String,
    pub cc_exp: String,
    pub zip: String,
}

impl From<CheckoutRequest> for CheckoutFields {
    fn from(request: CheckoutRequest) -> Self {
        CheckoutFields {
            email: request.email,
            address: request.address,
            cc_name: request.cc_name,
            cc_num: request.cc_num,
            cvv: request.cvv,
            cc_exp: request.cc_exp,
            zip: request.zip,
        }
    }
}

/// Checkout Response
///
/// Carries the paid order on success, or — with a 422 status — one error
/// entry per violated field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// The paid order, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderResponse>,

    /// Validation errors, present when the checkout was rejected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationErrorResponse>,
}

/// Checkout Handler
///
/// Converts a pending cart into a paid order, consuming stock. A rejected
/// checkout answers 422 with every violated field and leaves the order and
/// all stock untouched.
#[endpoint(
    tags("orders"),
    summary = "Checkout Order",
    responses(
        (status_code = StatusCode::OK, description = "Order paid"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed"),
        (status_code = StatusCode::CONFLICT, description = "Order is no longer an open cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let result = state
        .app
        .orders
        .checkout(order.into_inner().into(), json.into_inner().into())
        .await;

    match result {
        Ok(order) => Ok(Json(CheckoutResponse {
            order: Some(order.into()),
            errors: Vec::new(),
        })),
        Err(OrdersServiceError::Rejected(rejection)) => {
            res.status_code(StatusCode::UNPROCESSABLE_ENTITY);

            Ok(Json(CheckoutResponse {
                order: None,
                errors: field_errors(rejection),
            }))
        }
        Err(other) => Err(into_status_error(other)),
    }
}
