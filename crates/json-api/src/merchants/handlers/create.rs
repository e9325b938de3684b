//! Create Merchant Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_app::merchants::models::NewMerchant;

use crate::{
    extensions::*, merchants::errors::into_status_error,
    merchants::handlers::get::MerchantResponse, state::State,
};

/// Create Merchant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateMerchantRequest {
    pub uuid: Uuid,
    pub name: String,
}

impl From<CreateMerchantRequest> for NewMerchant {
    fn from(request: CreateMerchantRequest) -> Self {
        NewMerchant {
            uuid: request.uuid.into(),
            name: request.name,
        }
    }
}

/// Create Merchant Handler
#[endpoint(
    tags("merchants"),
    summary = "Create Merchant",
    responses(
        (status_code = StatusCode::CREATED, description = "Merchant created"),
        (status_code = StatusCode::CONFLICT, description = "Merchant already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateMerchantRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<MerchantResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let merchant = state
        .app
        .merchants
        .create_merchant(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let uuid = merchant.uuid;

    res.add_header(LOCATION, format!("/merchants/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(merchant.into()))
}
