//! Merchant Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Merchant UUID
pub type MerchantUuid = TypedUuid<Merchant>;

/// Merchant Model
#[derive(Debug, Clone)]
pub struct Merchant {
    pub uuid: MerchantUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Merchant Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewMerchant {
    pub uuid: MerchantUuid,
    pub name: String,
}
