//! Merchant Order View Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Merchant Order View Handler
///
/// Returns an order for a merchant's fulfillment view, but only when at
/// least one item of the order is a product of that merchant. Orders with
/// no matching item answer 404 — a refusal, indistinguishable from an order
/// that does not exist.
#[endpoint(
    tags("merchants"),
    summary = "Get Merchant Order",
    responses(
        (status_code = StatusCode::OK, description = "Order visible to this merchant"),
        (status_code = StatusCode::NOT_FOUND, description = "Order unknown or not this merchant's"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    merchant: PathParam<Uuid>,
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = order.into_inner().into();

    let authorized = state
        .app
        .orders
        .is_order_of(order, merchant.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if !authorized {
        return Err(StatusError::not_found());
    }

    let order = state
        .app
        .orders
        .get_order(order)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
