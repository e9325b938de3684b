//! Complete Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*, orders::errors::into_status_error, orders::handlers::get::OrderResponse,
    state::State,
};

/// Complete Order Handler
///
/// Completes a paid order once every item has shipped. In any other state
/// the order is returned unchanged, so the call is safe to repeat.
#[endpoint(tags("orders"), summary = "Complete Order")]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = state
        .app
        .orders
        .try_complete(order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bazaar_app::orders::{MockOrdersService, models::OrderStatus};

    use crate::test_helpers::{make_order, orders_service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(
            orders,
            Router::with_path("orders/{order}/complete").post(handler),
        )
    }

    #[tokio::test]
    async fn test_complete_returns_completed_order() -> TestResult {
        let mut orders = MockOrdersService::new();
        let uuid = Uuid::now_v7();

        let mut order = make_order(uuid);
        order.status = OrderStatus::Complete;

        orders
            .expect_try_complete()
            .once()
            .withf(move |o| o.into_uuid() == uuid)
            .return_once(move |_| Ok(order));

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/complete"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "complete");

        Ok(())
    }

    #[tokio::test]
    async fn test_complete_with_unshipped_items_keeps_order_paid() -> TestResult {
        let mut orders = MockOrdersService::new();
        let uuid = Uuid::now_v7();

        let mut order = make_order(uuid);
        order.status = OrderStatus::Paid;

        orders
            .expect_try_complete()
            .once()
            .return_once(move |_| Ok(order));

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/complete"))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "paid");

        Ok(())
    }
}
