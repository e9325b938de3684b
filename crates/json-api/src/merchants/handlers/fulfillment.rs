//! Merchant Fulfillment Queue Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::orders::models::FulfillmentItem;

use crate::{extensions::*, merchants::errors, orders::errors as order_errors, state::State};

/// Fulfillment Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct FulfillmentItemResponse {
    /// The order item to fulfill
    pub item_uuid: Uuid,

    /// The order it belongs to
    pub order_uuid: Uuid,

    /// The product to ship
    pub product_uuid: Uuid,

    /// Current display name of the product
    pub product_name: String,

    /// Units to ship
    pub quantity: u64,

    /// Whether this item has already shipped
    pub shipped: bool,

    /// When the order was paid
    pub ordered_at: String,
}

impl From<FulfillmentItem> for FulfillmentItemResponse {
    fn from(item: FulfillmentItem) -> Self {
        Self {
            item_uuid: item.item_uuid.into_uuid(),
            order_uuid: item.order_uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            quantity: item.quantity,
            shipped: item.shipped,
            ordered_at: item.ordered_at.to_string(),
        }
    }
}

/// Merchant Fulfillment Queue Handler
///
/// Lists the items of paid orders whose product belongs to the merchant.
#[endpoint(tags("merchants"), summary = "Merchant Fulfillment Queue")]
pub(crate) async fn handler(
    merchant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<FulfillmentItemResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let merchant = merchant.into_inner();

    // An unknown merchant is a 404, not an empty queue.
    state
        .app
        .merchants
        .get_merchant(merchant.into())
        .await
        .map_err(errors::into_status_error)?;

    let items = state
        .app
        .orders
        .list_fulfillment_items(merchant.into())
        .await
        .map_err(order_errors::into_status_error)?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}
