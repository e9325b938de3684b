//! Get Merchant Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::merchants::models::Merchant;

use crate::{extensions::*, merchants::errors::into_status_error, state::State};

/// Merchant Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MerchantResponse {
    /// The unique identifier of the merchant
    pub uuid: Uuid,

    /// Display name
    pub name: String,

    /// The date and time the merchant was created
    pub created_at: String,

    /// The date and time the merchant was last updated
    pub updated_at: String,
}

impl From<Merchant> for MerchantResponse {
    fn from(merchant: Merchant) -> Self {
        Self {
            uuid: merchant.uuid.into_uuid(),
            name: merchant.name,
            created_at: merchant.created_at.to_string(),
            updated_at: merchant.updated_at.to_string(),
        }
    }
}

/// Get Merchant Handler
///
/// Returns a single merchant.
#[endpoint(tags("merchants"), summary = "Get Merchant")]
pub(crate) async fn handler(
    merchant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MerchantResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let merchant = state
        .app
        .merchants
        .get_merchant(merchant.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(merchant.into()))
}
