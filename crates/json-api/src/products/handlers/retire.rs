//! Retire Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*, products::errors::into_status_error, products::handlers::get::ProductResponse,
    state::State,
};

/// Retire Product Handler
///
/// Products are never deleted: retiring hides the product from the
/// storefront and stops stock returns, but keeps it referenceable from past
/// orders.
#[endpoint(tags("products"), summary = "Retire Product")]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .retire_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(product.into()))
}
