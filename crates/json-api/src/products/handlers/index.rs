//! List Products Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*, products::errors::into_status_error, products::handlers::get::ProductResponse,
    state::State,
};

/// List Products Handler
///
/// Returns every product still on sale, or — given a `merchant` query
/// parameter — every product of that merchant, retired ones included.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    merchant: QueryParam<Uuid, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ProductResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let products = match merchant.into_inner() {
        Some(merchant) => state.app.products.list_merchant_products(merchant.into()),
        None => state.app.products.list_products(),
    }
    .await
    .map_err(into_status_error)?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::products::MockProductsService;

    use crate::test_helpers::{make_product, products_service};

    use super::*;

    fn make_service(products: MockProductsService) -> Service {
        products_service(products, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_products() -> TestResult {
        let mut products = MockProductsService::new();
        let uuid = Uuid::now_v7();

        let product = make_product(uuid);

        products
            .expect_list_products()
            .once()
            .return_once(move || Ok(vec![product]));

        let mut res = TestClient::get("http://example.com/products")
            .send(&make_service(products))
            .await;

        let body: Vec<ProductResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].uuid, uuid);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_filters_by_merchant() -> TestResult {
        let mut products = MockProductsService::new();
        let merchant = Uuid::now_v7();

        products
            .expect_list_merchant_products()
            .once()
            .withf(move |m| m.into_uuid() == merchant)
            .return_once(|_| Ok(Vec::new()));

        let res = TestClient::get(format!("http://example.com/products?merchant={merchant}"))
            .send(&make_service(products))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
