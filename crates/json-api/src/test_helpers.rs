//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use bazaar_app::{
    context::AppContext,
    merchants::{MockMerchantsService, models::Merchant},
    orders::{
        MockOrdersService,
        models::{Order, OrderItem, OrderStatus},
    },
    products::{MockProductsService, models::Product},
};

use crate::state::State;

/// Build a state around mock services. Mocks with no expectations panic on
/// first use, so handlers cannot quietly call services a test did not mean
/// to involve.
pub(crate) fn make_state(
    merchants: MockMerchantsService,
    products: MockProductsService,
    orders: MockOrdersService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        merchants: Arc::new(merchants),
        products: Arc::new(products),
        orders: Arc::new(orders),
    })
}

fn service_with(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn merchants_service(merchants: MockMerchantsService, route: Router) -> Service {
    service_with(
        make_state(merchants, MockProductsService::new(), MockOrdersService::new()),
        route,
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    service_with(
        make_state(MockMerchantsService::new(), products, MockOrdersService::new()),
        route,
    )
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    service_with(
        make_state(MockMerchantsService::new(), MockProductsService::new(), orders),
        route,
    )
}

pub(crate) fn make_merchant(uuid: Uuid) -> Merchant {
    Merchant {
        uuid: uuid.into(),
        name: "Copper Kettle Goods".to_string(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_product(uuid: Uuid) -> Product {
    Product {
        uuid: uuid.into(),
        merchant_uuid: Uuid::now_v7().into(),
        name: "Walnut serving board".to_string(),
        description: "Hand-finished, 40cm".to_string(),
        price: 45_00,
        stock: 12,
        retired: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: Uuid) -> Order {
    Order {
        uuid: uuid.into(),
        status: OrderStatus::Pending,
        email: None,
        address: None,
        cc_name: None,
        cc_num: None,
        cvv: None,
        cc_exp: None,
        zip: None,
        items: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_item(order_uuid: Uuid, quantity: u64, unit_price: u64) -> OrderItem {
    OrderItem {
        uuid: Uuid::now_v7().into(),
        order_uuid: order_uuid.into(),
        product_uuid: Uuid::now_v7().into(),
        product_name: "Walnut serving board".to_string(),
        merchant_uuid: Uuid::now_v7().into(),
        quantity,
        shipped: false,
        unit_price,
        stock: 100,
        retired: false,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
