//! Order Models

use std::str::FromStr;

use jiff::Timestamp;

use crate::{
    domain::{merchants::models::MerchantUuid, products::models::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// Order lifecycle.
///
/// `pending → paid → complete`, with `pending → cancel` and `paid → cancel`
/// as the alternate endings. `complete` and `cancel` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Complete,
    Cancel,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }

    /// Terminal states accept no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Cancel)
    }

    /// Cancellation is open to carts and paid orders only.
    #[must_use]
    pub const fn can_cancel(self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized status value coming out of storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a valid status")]
pub struct InvalidOrderStatus(pub String);

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "complete" => Ok(Self::Complete),
            "cancel" => Ok(Self::Cancel),
            other => Err(InvalidOrderStatus(other.to_string())),
        }
    }
}

/// Order Model
///
/// Contact and payment fields stay empty until checkout stores them.
#[derive(Debug, Clone)]
pub struct Order {
    pub uuid: OrderUuid,
    pub status: OrderStatus,
    pub email: Option<String>,
    pub address: Option<String>,
    pub cc_name: Option<String>,
    pub cc_num: Option<String>,
    pub cvv: Option<String>,
    pub cc_exp: Option<String>,
    pub zip: Option<String>,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Sum of the item subtotals. Always recomputed, never cached.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.items.iter().map(OrderItem::subtotal).sum()
    }

    /// True when at least one item is a product of the given merchant.
    #[must_use]
    pub fn involves_merchant(&self, merchant: MerchantUuid) -> bool {
        self.items.iter().any(|item| item.merchant_uuid == merchant)
    }

    /// True when every item has shipped.
    #[must_use]
    pub fn all_items_shipped(&self) -> bool {
        self.items.iter().all(|item| item.shipped)
    }
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
}

/// OrderItem Model
///
/// One product-and-quantity entry within an order. The product columns
/// (`unit_price`, `stock`, `retired`, …) are joined in at read time so the
/// item always reflects the product's current state.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub merchant_uuid: MerchantUuid,
    pub quantity: u64,
    pub shipped: bool,
    pub unit_price: u64,
    pub stock: u64,
    pub retired: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderItem {
    /// Quantity times the product's current price.
    #[must_use]
    pub const fn subtotal(&self) -> u64 {
        self.quantity * self.unit_price
    }
}

/// New Order Item Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u64,
}

/// One row of a merchant's fulfillment queue: an item of a paid order whose
/// product belongs to the merchant.
#[derive(Debug, Clone)]
pub struct FulfillmentItem {
    pub item_uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub quantity: u64,
    pub shipped: bool,
    pub ordered_at: Timestamp,
}
