//! Ship Order Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*, orders::errors::into_status_error, orders::handlers::get::OrderItemResponse,
    state::State,
};

/// Ship Order Item Handler
///
/// Marks one item of a paid order as shipped. Completing the order once
/// every item has shipped is a separate call.
#[endpoint(
    tags("orders"),
    summary = "Ship Order Item",
    responses(
        (status_code = StatusCode::OK, description = "Item marked shipped"),
        (status_code = StatusCode::CONFLICT, description = "Order has not been paid"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or item not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let item = state
        .app
        .orders
        .mark_item_shipped(order.into_inner().into(), item.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(item.into()))
}
