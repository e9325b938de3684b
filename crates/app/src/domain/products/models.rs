//! Product Models

use jiff::Timestamp;

use crate::{domain::merchants::models::MerchantUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
///
/// Prices are integer minor units (cents). `stock` is the live inventory
/// counter mutated by checkout and cancellation; it can never go negative.
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: ProductUuid,
    pub merchant_uuid: MerchantUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
    pub retired: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub merchant_uuid: MerchantUuid,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
}

/// Product Update Model
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u64,
}
