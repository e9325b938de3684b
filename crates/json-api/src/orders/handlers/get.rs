//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::orders::models::{Order, OrderItem};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    /// Lifecycle status: pending, paid, complete or cancel
    pub status: String,

    /// Buyer email, present once checked out
    pub email: Option<String>,

    /// Shipping address, present once checked out
    pub address: Option<String>,

    /// Shipping zip code, present once checked out
    pub zip: Option<String>,

    /// The items in the order
    pub items: Vec<OrderItemResponse>,

    /// Sum of the item subtotals, in minor units
    pub total: u64,

    /// The date and time the order was created
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let total = order.total();

        Self {
            uuid: order.uuid.into_uuid(),
            status: order.status.to_string(),
            email: order.email,
            address: order.address,
            zip: order.zip,
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            total,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    /// The unique identifier of the order item
    pub uuid: Uuid,

    /// The product in this item
    pub product_uuid: Uuid,

    /// Current display name of the product
    pub product_name: String,

    /// The merchant offering the product
    pub merchant_uuid: Uuid,

    /// Units ordered
    pub quantity: u64,

    /// Whether the merchant has shipped this item
    pub shipped: bool,

    /// Current unit price in minor units
    pub unit_price: u64,

    /// Quantity times the current unit price
    pub subtotal: u64,

    /// The date and time the item was created
    pub created_at: String,

    /// The date and time the item was last updated
    pub updated_at: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        let subtotal = item.subtotal();

        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product_uuid.into_uuid(),
            product_name: item.product_name,
            merchant_uuid: item.merchant_uuid.into_uuid(),
            quantity: item.quantity,
            shipped: item.shipped,
            unit_price: item.unit_price,
            subtotal,
            created_at: item.created_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Returns an order with its items and computed total.
#[endpoint(tags("orders"), summary = "Get Order")]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .get_order(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
