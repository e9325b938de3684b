//! Add Order Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::orders::models::NewOrderItem;

use crate::{
    extensions::*, orders::errors::into_status_error, orders::handlers::get::OrderItemResponse,
    state::State,
};

/// Add Order Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddItemRequest {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub quantity: u64,
}

impl From<AddItemRequest> for NewOrderItem {
    fn from(request: AddItemRequest) -> Self {
        NewOrderItem {
            uuid: request.uuid.into(),
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Add Order Item Handler
///
/// Adds a product to a pending cart. Quantities beyond the product's stock
/// answer 422.
#[endpoint(
    tags("orders"),
    summary = "Add Order Item",
    responses(
        (status_code = StatusCode::CREATED, description = "Item added"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Validation failed"),
        (status_code = StatusCode::CONFLICT, description = "Order is no longer an open cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown product"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<AddItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = order.into_inner();

    let item = state
        .app
        .orders
        .add_item(order.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let uuid = item.uuid.into_uuid();

    res.add_header(LOCATION, format!("/orders/{order}/items/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
