//! App Router

use salvo::Router;

use crate::{merchants, orders, products};

pub fn app_router() -> Router {
    Router::new()
        .push(
            Router::with_path("merchants")
                .post(merchants::create::handler)
                .push(
                    Router::with_path("{merchant}")
                        .get(merchants::get::handler)
                        .push(
                            Router::with_path("fulfillment").get(merchants::fulfillment::handler),
                        )
                        .push(Router::with_path("orders/{order}").get(merchants::orders::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::retire::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("checkout").post(orders::checkout::handler))
                        .push(Router::with_path("cancel").post(orders::cancel::handler))
                        .push(Router::with_path("complete").post(orders::complete::handler))
                        .push(
                            Router::with_path("items")
                                .post(orders::items::create::handler)
                                .push(
                                    Router::with_path("{item}")
                                        .put(orders::items::update::handler)
                                        .delete(orders::items::delete::handler)
                                        .push(
                                            Router::with_path("ship")
                                                .post(orders::items::ship::handler),
                                        ),
                                ),
                        ),
                ),
        )
}
